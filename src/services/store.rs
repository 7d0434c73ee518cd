//! Storage interfaces consumed by the matching service
//!
//! Each collection the service touches sits behind its own trait so the
//! PostgreSQL and in-memory backends can be swapped without touching the
//! matching logic.

use crate::core::VolunteerFilter;
use crate::models::{Event, HistoryQuery, MatchRecord, Notification, ProfileUpdate, Volunteer};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to volunteer profiles
///
/// Multi-document reads return volunteers in directory order (creation
/// order, then id) so rankings over the same data are reproducible.
#[async_trait]
pub trait VolunteerDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Volunteer>>;

    /// Batch lookup; ids that do not resolve are skipped
    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Volunteer>>;

    /// Volunteers matching the candidate predicate
    async fn find_candidates(&self, filter: &VolunteerFilter) -> StoreResult<Vec<Volunteer>>;

    async fn insert(&self, volunteer: Volunteer) -> StoreResult<Volunteer>;

    /// Apply a profile update, returning `None` if the volunteer doesn't exist
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> StoreResult<Option<Volunteer>>;
}

#[async_trait]
pub trait EventDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Event>>;

    async fn list(&self) -> StoreResult<Vec<Event>>;

    async fn insert(&self, event: Event) -> StoreResult<Event>;

    /// Replace an event, returning `None` if it doesn't exist
    async fn update(&self, event: Event) -> StoreResult<Option<Event>>;

    /// Returns whether a document was removed
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// Append-only collection of committed matches
#[async_trait]
pub trait MatchHistoryStore: Send + Sync {
    async fn insert(&self, record: MatchRecord) -> StoreResult<MatchRecord>;

    /// Records matching the query, oldest match first
    async fn list(&self, query: &HistoryQuery) -> StoreResult<Vec<MatchRecord>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: Notification) -> StoreResult<Notification>;

    /// Notifications for a user, newest first
    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>>;

    /// Mark a user's notification read, returning `None` if it doesn't exist
    async fn mark_read(&self, user_id: &str, id: &str) -> StoreResult<Option<Notification>>;
}
