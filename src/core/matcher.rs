use crate::core::{
    filters::{is_eligible, VolunteerFilter},
    ranking::Priority,
};
use crate::models::{RankedVolunteer, Volunteer};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<RankedVolunteer>,
    pub total_candidates: usize,
}

/// Main matching orchestrator - filters candidates and ranks them for an event
///
/// # Pipeline Stages
/// 1. Eligibility (declared interest or skill overlap, plus availability)
/// 2. Prioritization (best preference, then skill match)
///
/// The matcher is pure: no I/O, and the same input always gives the same order.
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Filter and rank candidates for an event
    ///
    /// # Arguments
    /// * `filter` - Eligibility predicate built from the event
    /// * `candidates` - Volunteers returned by the directory, in directory order
    ///
    /// # Returns
    /// MatchResult containing eligible volunteers in priority order
    pub fn find_candidates(&self, filter: &VolunteerFilter, candidates: Vec<Volunteer>) -> MatchResult {
        let total_candidates = candidates.len();

        let eligible: Vec<Volunteer> = candidates
            .into_iter()
            .filter(|volunteer| is_eligible(volunteer, filter))
            .collect();

        MatchResult {
            matches: self.rank(eligible, &filter.required_skills),
            total_candidates,
        }
    }

    /// Rank volunteers against an event's required skills
    ///
    /// Uses a stable sort, so volunteers with equal priority keep their input order.
    pub fn rank(&self, volunteers: Vec<Volunteer>, required_skills: &[String]) -> Vec<RankedVolunteer> {
        let mut prioritized: Vec<(Priority, Volunteer)> = volunteers
            .into_iter()
            .map(|volunteer| (Priority::of(&volunteer, required_skills), volunteer))
            .collect();

        prioritized.sort_by(|(a, _), (b, _)| a.cmp(b));

        prioritized
            .into_iter()
            .map(|(priority, volunteer)| RankedVolunteer {
                volunteer,
                preference_rank: priority.preference.rank(),
                skill_match: priority.skill_match,
            })
            .collect()
    }
}
