// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Availability, Event, HistoryQuery, MatchRecord, Notification, ProfileUpdate, RankedVolunteer, Volunteer};
pub use requests::{CreateNotificationRequest, CreateVolunteerRequest, EventRequest, SaveMatchRequest, UpdateProfileRequest};
pub use responses::{CommitFailureResponse, ErrorResponse, HealthResponse, MessageResponse, SaveMatchResponse, SAVE_MATCH_MESSAGE};
