// Service exports
pub mod cache;
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::CachedEventDirectory;
pub use matching::{MatchError, MatchingOptions, MatchingService, Step};
pub use memory::InMemoryStore;
pub use postgres::PostgresClient;
pub use store::{EventDirectory, MatchHistoryStore, NotificationStore, StoreError, StoreResult, VolunteerDirectory};
