use crate::core::{new_id, normalize_id};
use crate::models::{CreateVolunteerRequest, UpdateProfileRequest};
use crate::routes::{error_response, invalid_id_response, server_error_response, AppState};
use crate::services::StoreError;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/users", web::post().to(create_volunteer))
        .route("/users/{id}", web::get().to(get_volunteer))
        .route("/users/{id}/profile", web::put().to(update_profile));
}

fn invalid_availability() -> HttpResponse {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_failed",
        "availability.startDate must not be after availability.endDate",
    )
}

/// POST /api/v1/users
async fn create_volunteer(
    state: web::Data<AppState>,
    req: web::Json<CreateVolunteerRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }
    if req.availability.is_some_and(|a| !a.is_well_formed()) {
        return invalid_availability();
    }

    let volunteer = req.into_inner().into_volunteer(new_id());

    match state.volunteers.insert(volunteer).await {
        Ok(volunteer) => {
            tracing::info!("Created volunteer profile {}", volunteer.id);
            HttpResponse::Created().json(volunteer)
        }
        Err(StoreError::Conflict(reason)) => {
            tracing::info!("Rejected volunteer profile: {}", reason);
            error_response(StatusCode::BAD_REQUEST, "email_in_use", "Email already in use")
        }
        Err(e) => server_error_response("Failed to create volunteer", &e),
    }
}

/// GET /api/v1/users/{id}
async fn get_volunteer(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let Some(id) = normalize_id(&path) else {
        return invalid_id_response("volunteer");
    };

    match state.volunteers.find_by_id(&id).await {
        Ok(Some(volunteer)) => HttpResponse::Ok().json(volunteer),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
        Err(e) => server_error_response("Failed to fetch volunteer", &e),
    }
}

/// PUT /api/v1/users/{id}/profile
///
/// Only the fields present in the body are changed.
async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    let Some(id) = normalize_id(&path) else {
        return invalid_id_response("volunteer");
    };
    if req.availability.is_some_and(|a| !a.is_well_formed()) {
        return invalid_availability();
    }

    match state.volunteers.update_profile(&id, req.into_inner().into()).await {
        Ok(Some(volunteer)) => {
            tracing::debug!("Updated profile for volunteer {}", id);
            HttpResponse::Ok().json(volunteer)
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
        Err(e) => server_error_response("Failed to update volunteer profile", &e),
    }
}
