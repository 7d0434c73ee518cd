use crate::core::{new_id, normalize_id};
use crate::models::{EventRequest, MessageResponse};
use crate::routes::{error_response, invalid_id_response, server_error_response, AppState};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events")
            .route(web::get().to(list_events))
            .route(web::post().to(create_event)),
    )
    .service(
        web::resource("/events/{id}")
            .route(web::put().to(update_event))
            .route(web::delete().to(delete_event)),
    );
}

async fn list_events(state: web::Data<AppState>) -> impl Responder {
    match state.events.list().await {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => server_error_response("Failed to list events", &e),
    }
}

/// POST /api/v1/events
async fn create_event(
    state: web::Data<AppState>,
    req: web::Json<EventRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let event = req.into_inner().into_event(new_id());

    match state.events.insert(event).await {
        Ok(event) => {
            tracing::info!("Created event {} ({})", event.id, event.event_name);
            HttpResponse::Created().json(event)
        }
        Err(e) => server_error_response("Failed to create event", &e),
    }
}

/// PUT /api/v1/events/{id}
///
/// Replaces every field of the event. Existing match history keeps the
/// values it was recorded with.
async fn update_event(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<EventRequest>,
) -> impl Responder {
    let Some(id) = normalize_id(&path) else {
        return invalid_id_response("event");
    };
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    match state.events.update(req.into_inner().into_event(id)).await {
        Ok(Some(event)) => HttpResponse::Ok().json(event),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Event not found"),
        Err(e) => server_error_response("Failed to update event", &e),
    }
}

/// DELETE /api/v1/events/{id}
async fn delete_event(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let Some(id) = normalize_id(&path) else {
        return invalid_id_response("event");
    };

    match state.events.delete(&id).await {
        Ok(true) => HttpResponse::Ok().json(MessageResponse {
            message: "Event deleted".to_string(),
        }),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "Event not found"),
        Err(e) => server_error_response("Failed to delete event", &e),
    }
}
