use crate::core::normalize_id;
use crate::models::HistoryQuery;
use crate::routes::{invalid_id_response, server_error_response, AppState};
use actix_web::{web, HttpResponse, Responder};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/volunteerHistory", web::get().to(list_history));
}

/// Committed matches, optionally narrowed to a volunteer and/or event
///
/// GET /api/v1/volunteerHistory?volunteerId={id}&eventId={id}
async fn list_history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    let query = query.into_inner();

    let volunteer_id = match query.volunteer_id.as_deref().map(normalize_id) {
        Some(None) => return invalid_id_response("volunteer"),
        Some(Some(id)) => Some(id),
        None => None,
    };
    let event_id = match query.event_id.as_deref().map(normalize_id) {
        Some(None) => return invalid_id_response("event"),
        Some(Some(id)) => Some(id),
        None => None,
    };
    let query = HistoryQuery { volunteer_id, event_id };

    match state.history.list(&query).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => server_error_response("Failed to fetch volunteer history", &e),
    }
}
