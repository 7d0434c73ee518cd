use crate::core::{filters::has_skill_overlap, PreferenceLevel};
use crate::models::Volunteer;
use std::cmp::Ordering;

/// Best (lowest-ranked) preference across the required skills
///
/// Missing or unknown entries count as `Unspecified`, as does an empty skill list.
#[inline]
pub fn preference_score(volunteer: &Volunteer, required_skills: &[String]) -> PreferenceLevel {
    required_skills
        .iter()
        .map(|skill| volunteer.preference_for(skill))
        .min()
        .unwrap_or_default()
}

/// Sort key for a candidate
///
/// Ordered by preference first, then volunteers who already list a required
/// skill ahead of those who don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub preference: PreferenceLevel,
    pub skill_match: bool,
}

impl Priority {
    pub fn of(volunteer: &Volunteer, required_skills: &[String]) -> Self {
        Self {
            preference: preference_score(volunteer, required_skills),
            skill_match: has_skill_overlap(volunteer, required_skills),
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.preference
            .cmp(&other.preference)
            // true sorts before false
            .then_with(|| other.skill_match.cmp(&self.skill_match))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
