use crate::auth::AuthenticatedUser;
use crate::core::normalize_id;
use crate::models::{CreateNotificationRequest, Notification};
use crate::routes::{error_response, invalid_id_response, server_error_response, AppState};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notifications")
            .route(web::get().to(list_notifications))
            .route(web::post().to(create_notification)),
    )
    .route("/notifications/{id}/read", web::put().to(mark_read));
}

/// Notifications for the authenticated user, newest first
async fn list_notifications(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> impl Responder {
    match state.notifications.list_for_user(&user.id).await {
        Ok(notifications) => HttpResponse::Ok().json(notifications),
        Err(e) => server_error_response("Failed to fetch notifications", &e),
    }
}

async fn create_notification(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateNotificationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }
    let req = req.into_inner();
    let event_id = match req.event_id.as_deref().map(normalize_id) {
        Some(None) => return invalid_id_response("event"),
        Some(Some(id)) => Some(id),
        None => None,
    };

    let notification = Notification::new(user.id, req.title, req.message, event_id);

    match state.notifications.insert(notification).await {
        Ok(notification) => HttpResponse::Created().json(notification),
        Err(e) => server_error_response("Failed to create notification", &e),
    }
}

async fn mark_read(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder {
    let Some(id) = normalize_id(&path) else {
        return invalid_id_response("notification");
    };

    match state.notifications.mark_read(&user.id, &id).await {
        Ok(Some(notification)) => HttpResponse::Ok().json(notification),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Notification not found"),
        Err(e) => server_error_response("Failed to update notification", &e),
    }
}
