use crate::models::Volunteer;
use chrono::NaiveDate;

/// How to treat volunteers that never set an availability window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityPolicy {
    /// Unscheduled volunteers are considered always available
    #[default]
    IncludeUnscheduled,
    /// Unscheduled volunteers are never matched
    ExcludeUnscheduled,
}

impl AvailabilityPolicy {
    pub fn from_include_flag(include_unscheduled: bool) -> Self {
        if include_unscheduled {
            Self::IncludeUnscheduled
        } else {
            Self::ExcludeUnscheduled
        }
    }
}

/// Candidate predicate built from an event
#[derive(Debug, Clone)]
pub struct VolunteerFilter {
    pub required_skills: Vec<String>,
    pub event_date: NaiveDate,
    pub availability: AvailabilityPolicy,
}

impl VolunteerFilter {
    pub fn for_event(event: &crate::models::Event, availability: AvailabilityPolicy) -> Self {
        Self {
            required_skills: event.required_skills.clone(),
            event_date: event.event_date,
            availability,
        }
    }
}

/// True if the volunteer declared a known preference for any required skill
#[inline]
pub fn has_declared_interest(volunteer: &Volunteer, required_skills: &[String]) -> bool {
    required_skills
        .iter()
        .any(|skill| volunteer.preference_for(skill).is_declared())
}

/// True if the volunteer lists at least one required skill
#[inline]
pub fn has_skill_overlap(volunteer: &Volunteer, required_skills: &[String]) -> bool {
    required_skills.iter().any(|skill| volunteer.has_skill(skill))
}

/// Check the volunteer's availability window against the event date
#[inline]
pub fn is_available(volunteer: &Volunteer, event_date: NaiveDate, policy: AvailabilityPolicy) -> bool {
    match volunteer.availability {
        Some(window) if !window.is_unscheduled() => window.contains(event_date),
        _ => policy == AvailabilityPolicy::IncludeUnscheduled,
    }
}

/// Full eligibility check for ranking
#[inline]
pub fn is_eligible(volunteer: &Volunteer, filter: &VolunteerFilter) -> bool {
    (has_declared_interest(volunteer, &filter.required_skills)
        || has_skill_overlap(volunteer, &filter.required_skills))
        && is_available(volunteer, filter.event_date, filter.availability)
}
