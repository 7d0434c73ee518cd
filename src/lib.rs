//! Volunteer Match - volunteer-to-event matching service
//!
//! This library ranks volunteers for an event by declared preference and
//! skill overlap, and records committed matches as an immutable history.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, PreferenceLevel};
pub use models::{Event, MatchRecord, RankedVolunteer, Volunteer};
pub use services::{MatchError, MatchingService};
