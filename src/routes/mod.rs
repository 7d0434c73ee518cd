// Route exports
pub mod events;
pub mod history;
pub mod matches;
pub mod notifications;
pub mod users;

use crate::core::Matcher;
use crate::models::{CommitFailureResponse, ErrorResponse};
use crate::services::{
    EventDirectory, InMemoryStore, MatchError, MatchHistoryStore, MatchingOptions, MatchingService,
    NotificationStore, PostgresClient, StoreError, VolunteerDirectory,
};
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matching: MatchingService,
    pub volunteers: Arc<dyn VolunteerDirectory>,
    pub events: Arc<dyn EventDirectory>,
    pub history: Arc<dyn MatchHistoryStore>,
    pub notifications: Arc<dyn NotificationStore>,
    /// Set when running against PostgreSQL, used by the health check
    pub postgres: Option<Arc<PostgresClient>>,
}

impl AppState {
    pub fn new(
        volunteers: Arc<dyn VolunteerDirectory>,
        events: Arc<dyn EventDirectory>,
        history: Arc<dyn MatchHistoryStore>,
        notifications: Arc<dyn NotificationStore>,
        options: MatchingOptions,
    ) -> Self {
        let matching = MatchingService::new(
            volunteers.clone(),
            events.clone(),
            history.clone(),
            notifications.clone(),
            Matcher::new(),
            options,
        );

        Self {
            matching,
            volunteers,
            events,
            history,
            notifications,
            postgres: None,
        }
    }

    /// State backed entirely by one in-memory store
    pub fn in_memory(store: Arc<InMemoryStore>, options: MatchingOptions) -> Self {
        Self::new(store.clone(), store.clone(), store.clone(), store, options)
    }

    pub fn with_postgres(mut self, postgres: Arc<PostgresClient>) -> Self {
        self.postgres = Some(postgres);
        self
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(events::configure)
            .configure(history::configure)
            .configure(users::configure)
            .configure(notifications::configure),
    );
}

/// Error raised while extracting a JSON body or query string
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// JSON body extractor config answering malformed bodies with `invalid_json`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(handle_query_payload_error)
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn invalid_id_response(field: &str) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "invalid_id", format!("Invalid {} ID", field))
}

pub(crate) fn server_error_response(context: &str, err: &StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "server_error", "Server error")
}

/// Map a matching error onto its HTTP response
pub(crate) fn match_error_response(err: MatchError) -> HttpResponse {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match err {
        MatchError::InvalidId { field, id } => {
            tracing::info!("Rejected malformed {} id {:?}", field, id);
            invalid_id_response(field)
        }
        MatchError::EmptyVolunteerList => {
            error_response(status, "validation_failed", "At least one volunteer id is required")
        }
        MatchError::EventNotFound(_) => error_response(status, "not_found", "Event not found"),
        MatchError::VolunteersNotFound => error_response(status, "not_found", "No matching volunteers found"),
        MatchError::Store { step, written, source } => {
            tracing::error!("Matching failed while {}: {}", step, source);
            if written.is_empty() {
                error_response(status, "server_error", "Server error")
            } else {
                HttpResponse::build(status).json(CommitFailureResponse {
                    error: "partial_commit".to_string(),
                    message: format!(
                        "Server error: {} matches were saved before {} failed",
                        written.len(),
                        step
                    ),
                    status_code: status.as_u16(),
                    written,
                })
            }
        }
    }
}
