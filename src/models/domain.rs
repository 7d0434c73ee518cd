use crate::core::PreferenceLevel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date range during which a volunteer can help
///
/// Either end may be missing. A window with neither end set is "unscheduled".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "startDate", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<NaiveDate>,
}

impl Availability {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    pub fn is_unscheduled(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }

    /// Inclusive containment check; a missing end does not bound that side
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| start <= date)
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// False when both ends are set and the start is after the end
    pub fn is_well_formed(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

/// Volunteer profile as stored in the volunteer directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "volunteeringPreferences", default)]
    pub volunteering_preferences: BTreeMap<String, PreferenceLevel>,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Volunteer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Preference for a skill category, `Unspecified` when not declared
    #[inline]
    pub fn preference_for(&self, skill: &str) -> PreferenceLevel {
        self.volunteering_preferences
            .get(skill)
            .copied()
            .unwrap_or_default()
    }

    #[inline]
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// Volunteering opportunity as stored in the event directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "eventDescription", default)]
    pub event_description: String,
    pub location: String,
    #[serde(rename = "eventDate")]
    pub event_date: NaiveDate,
    pub urgency: String,
    #[serde(rename = "requiredSkills")]
    pub required_skills: Vec<String>,
}

/// One committed volunteer-to-event assignment
///
/// Event and volunteer fields are copied at match time and never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "volunteerId")]
    pub volunteer_id: String,
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "volunteerName")]
    pub volunteer_name: String,
    #[serde(rename = "eventDate")]
    pub event_date: NaiveDate,
    pub location: String,
    pub urgency: String,
    #[serde(rename = "requiredSkills")]
    pub required_skills: Vec<String>,
    #[serde(rename = "matchDate")]
    pub match_date: DateTime<Utc>,
}

impl MatchRecord {
    /// Snapshot an event and a volunteer into a new history record
    pub fn snapshot(event: &Event, volunteer: &Volunteer, matched_at: DateTime<Utc>) -> Self {
        Self {
            id: crate::core::ids::new_id(),
            volunteer_id: volunteer.id.clone(),
            event_id: event.id.clone(),
            event_name: event.event_name.clone(),
            volunteer_name: volunteer.display_name(),
            event_date: event.event_date,
            location: event.location.clone(),
            urgency: event.urgency.clone(),
            required_skills: event.required_skills.clone(),
            match_date: matched_at,
        }
    }
}

/// Volunteer with the priority it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVolunteer {
    #[serde(flatten)]
    pub volunteer: Volunteer,
    /// Best preference over the event's required skills, 1 (highest) to 4
    #[serde(rename = "preferenceRank")]
    pub preference_rank: u8,
    #[serde(rename = "skillMatch")]
    pub skill_match: bool,
}

/// In-app notification for a volunteer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "isRead", default)]
    pub is_read: bool,
    #[serde(rename = "eventId", default)]
    pub event_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: String, title: String, message: String, event_id: Option<String>) -> Self {
        Self {
            id: crate::core::ids::new_id(),
            user_id,
            title,
            message,
            is_read: false,
            event_id,
            created_at: Utc::now(),
        }
    }

    /// Notification telling a volunteer they were assigned to an event
    pub fn assignment(volunteer_id: &str, event: &Event) -> Self {
        Self::new(
            volunteer_id.to_string(),
            format!("Assigned to Event: {}", event.event_name),
            format!(
                "You have been assigned to the event: {} happening on {}",
                event.event_name, event.event_date
            ),
            Some(event.id.clone()),
        )
    }
}

/// Filter for listing history records
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "volunteerId", default)]
    pub volunteer_id: Option<String>,
    #[serde(rename = "eventId", default)]
    pub event_id: Option<String>,
}

impl HistoryQuery {
    pub fn matches(&self, record: &MatchRecord) -> bool {
        self.volunteer_id
            .as_deref()
            .map_or(true, |id| id == record.volunteer_id)
            && self
                .event_id
                .as_deref()
                .map_or(true, |id| id == record.event_id)
    }
}

/// Profile fields a volunteer may change after creation
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub skills: Option<Vec<String>>,
    pub volunteering_preferences: Option<BTreeMap<String, PreferenceLevel>>,
    pub availability: Option<Availability>,
}

impl ProfileUpdate {
    pub fn apply(self, volunteer: &mut Volunteer) {
        if let Some(skills) = self.skills {
            volunteer.skills = skills;
        }
        if let Some(preferences) = self.volunteering_preferences {
            volunteer.volunteering_preferences = preferences;
        }
        if let Some(availability) = self.availability {
            volunteer.availability = Some(availability);
        }
    }
}
