// Core algorithm exports
pub mod filters;
pub mod ids;
pub mod matcher;
pub mod preference;
pub mod ranking;

pub use filters::{has_declared_interest, has_skill_overlap, is_available, is_eligible, AvailabilityPolicy, VolunteerFilter};
pub use ids::{is_valid_id, new_id, normalize_id, validate_id};
pub use matcher::{MatchResult, Matcher};
pub use preference::PreferenceLevel;
pub use ranking::{preference_score, Priority};
