use serde::{Deserialize, Serialize};
use crate::models::domain::MatchRecord;

pub const SAVE_MATCH_MESSAGE: &str =
    "Volunteers matched, prioritized, and saved to the history successfully!";

/// Response for the save match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMatchResponse {
    pub message: String,
    pub matches: Vec<MatchRecord>,
}

/// Error response for a commit that failed part way through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFailureResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Matches recorded before the failure
    pub written: Vec<MatchRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
