use crate::core::PreferenceLevel;
use crate::models::domain::{Availability, Event, ProfileUpdate, Volunteer};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Request to commit matches for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMatchRequest {
    #[serde(alias = "event_id", rename = "eventId")]
    pub event_id: String,
    #[serde(default)]
    #[serde(alias = "volunteer_ids", rename = "volunteerIds")]
    pub volunteer_ids: Vec<String>,
}

/// Request body for creating or replacing an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[validate(length(min = 1))]
    #[serde(rename = "eventDescription")]
    pub event_description: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(rename = "eventDate")]
    pub event_date: NaiveDate,
    #[validate(length(min = 1))]
    pub urgency: String,
    #[validate(length(min = 1))]
    #[serde(rename = "requiredSkills")]
    pub required_skills: Vec<String>,
}

impl EventRequest {
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            event_name: self.event_name,
            event_description: self.event_description,
            location: self.location,
            event_date: self.event_date,
            urgency: self.urgency,
            required_skills: self.required_skills,
        }
    }
}

/// Request to create a volunteer profile (credentials are handled elsewhere)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVolunteerRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[validate(length(min = 1))]
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "volunteeringPreferences", default)]
    pub volunteering_preferences: BTreeMap<String, PreferenceLevel>,
    #[serde(default)]
    pub availability: Option<Availability>,
}

impl CreateVolunteerRequest {
    pub fn into_volunteer(self, id: String) -> Volunteer {
        Volunteer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email.map(|e| e.to_lowercase()),
            skills: self.skills,
            volunteering_preferences: self.volunteering_preferences,
            availability: self.availability,
            created_at: None,
        }
    }
}

/// Partial update of a volunteer's matching profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(rename = "volunteeringPreferences", default)]
    pub volunteering_preferences: Option<BTreeMap<String, PreferenceLevel>>,
    #[serde(default)]
    pub availability: Option<Availability>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(value: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            skills: value.skills,
            volunteering_preferences: value.volunteering_preferences,
            availability: value.availability,
        }
    }
}

/// Request to create a notification for the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(rename = "eventId", default)]
    pub event_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_request_requires_skills() {
        let json = r#"{
            "eventName": "Cleanup",
            "eventDescription": "Park cleanup",
            "location": "Houston",
            "eventDate": "2024-06-01",
            "urgency": "High",
            "requiredSkills": []
        }"#;
        let req: EventRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_save_match_accepts_snake_case() {
        let json = r#"{"event_id": "64b8f9c01234567890abcdef", "volunteer_ids": ["64b8f9c01234567890abc003"]}"#;
        let req: SaveMatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.volunteer_ids.len(), 1);
    }
}
