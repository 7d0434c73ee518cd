use crate::models::{HealthResponse, SaveMatchRequest, SaveMatchResponse, SAVE_MATCH_MESSAGE};
use crate::routes::{match_error_response, AppState};
use actix_web::{web, HttpResponse, Responder};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/volunteerMatch/matchByEvent/{event_id}", web::get().to(match_by_event))
        .route("/volunteerMatch/saveMatch", web::post().to(save_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked volunteers for an event
///
/// GET /api/v1/volunteerMatch/matchByEvent/{eventId}
async fn match_by_event(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let event_id = path.into_inner();

    tracing::info!("Ranking volunteers for event: {}", event_id);

    match state.matching.get_ranked_candidates(&event_id).await {
        Ok(ranked) => HttpResponse::Ok().json(ranked),
        Err(e) => match_error_response(e),
    }
}

/// Commit matches for a set of volunteers
///
/// POST /api/v1/volunteerMatch/saveMatch
///
/// Request body:
/// ```json
/// {
///   "eventId": "string",
///   "volunteerIds": ["string"]
/// }
/// ```
async fn save_match(
    state: web::Data<AppState>,
    req: web::Json<SaveMatchRequest>,
) -> impl Responder {
    let req = req.into_inner();

    tracing::info!(
        "Committing {} volunteers to event {}",
        req.volunteer_ids.len(),
        req.event_id
    );

    match state.matching.commit_matches(&req.event_id, &req.volunteer_ids).await {
        Ok(matches) => HttpResponse::Created().json(SaveMatchResponse {
            message: SAVE_MATCH_MESSAGE.to_string(),
            matches,
        }),
        Err(e) => match_error_response(e),
    }
}
