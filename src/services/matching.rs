//! Matching service - ranks candidates for an event and commits matches
//!
//! Both entry points validate ids before touching any store. Commit writes
//! one history record per ranked volunteer, sequentially and in rank order.
//! There is no transaction around the batch: if a write fails, the records
//! already written stay written and are handed back inside the error.

use crate::core::{validate_id, AvailabilityPolicy, Matcher, VolunteerFilter};
use crate::models::{Event, MatchRecord, Notification, RankedVolunteer};
use crate::services::store::{
    EventDirectory, MatchHistoryStore, NotificationStore, StoreError, VolunteerDirectory,
};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Step of an operation that talked to a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    LoadEvent,
    LoadCandidates,
    LoadVolunteers,
    PersistMatch { volunteer_id: String },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::LoadEvent => f.write_str("loading event"),
            Step::LoadCandidates => f.write_str("loading candidate volunteers"),
            Step::LoadVolunteers => f.write_str("loading selected volunteers"),
            Step::PersistMatch { volunteer_id } => {
                write!(f, "persisting match for volunteer {}", volunteer_id)
            }
        }
    }
}

/// Errors returned by the matching service
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid {field} ID: {id}")]
    InvalidId { field: &'static str, id: String },

    #[error("At least one volunteer id is required")]
    EmptyVolunteerList,

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("None of the requested volunteers were found")]
    VolunteersNotFound,

    #[error("Store error while {step}: {source}")]
    Store {
        step: Step,
        /// Records committed before the failure; empty for read steps
        written: Vec<MatchRecord>,
        #[source]
        source: StoreError,
    },
}

impl MatchError {
    fn store(step: Step, source: StoreError) -> Self {
        MatchError::Store {
            step,
            written: Vec::new(),
            source,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MatchError::InvalidId { .. } | MatchError::EmptyVolunteerList => 400,
            MatchError::EventNotFound(_) | MatchError::VolunteersNotFound => 404,
            MatchError::Store { .. } => 500,
        }
    }
}

/// Matching behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingOptions {
    pub availability: AvailabilityPolicy,
    /// Send an assignment notification for each committed match
    pub notify_on_commit: bool,
}

/// Ranks volunteers for events and records committed matches
#[derive(Clone)]
pub struct MatchingService {
    volunteers: Arc<dyn VolunteerDirectory>,
    events: Arc<dyn EventDirectory>,
    history: Arc<dyn MatchHistoryStore>,
    notifications: Arc<dyn NotificationStore>,
    matcher: Matcher,
    options: MatchingOptions,
}

impl MatchingService {
    pub fn new(
        volunteers: Arc<dyn VolunteerDirectory>,
        events: Arc<dyn EventDirectory>,
        history: Arc<dyn MatchHistoryStore>,
        notifications: Arc<dyn NotificationStore>,
        matcher: Matcher,
        options: MatchingOptions,
    ) -> Self {
        Self {
            volunteers,
            events,
            history,
            notifications,
            matcher,
            options,
        }
    }

    async fn load_event(&self, event_id: &str) -> Result<Event, MatchError> {
        self.events
            .find_by_id(event_id)
            .await
            .map_err(|e| MatchError::store(Step::LoadEvent, e))?
            .ok_or_else(|| MatchError::EventNotFound(event_id.to_string()))
    }

    /// Eligible volunteers for an event, highest priority first
    pub async fn get_ranked_candidates(&self, event_id: &str) -> Result<Vec<RankedVolunteer>, MatchError> {
        let event_id = validate_id("event", event_id)?;

        let event = self.load_event(&event_id).await?;
        let filter = VolunteerFilter::for_event(&event, self.options.availability);

        let candidates = self
            .volunteers
            .find_candidates(&filter)
            .await
            .map_err(|e| MatchError::store(Step::LoadCandidates, e))?;

        let result = self.matcher.find_candidates(&filter, candidates);

        tracing::info!(
            "Ranked {} volunteers for event {} (from {} candidates)",
            result.matches.len(),
            event_id,
            result.total_candidates
        );

        Ok(result.matches)
    }

    /// Rank the selected volunteers and record one match per volunteer
    ///
    /// Ids that don't resolve to a volunteer are skipped. All records share
    /// a single match timestamp taken once per commit.
    pub async fn commit_matches(
        &self,
        event_id: &str,
        volunteer_ids: &[String],
    ) -> Result<Vec<MatchRecord>, MatchError> {
        let event_id = validate_id("event", event_id)?;
        if volunteer_ids.is_empty() {
            return Err(MatchError::EmptyVolunteerList);
        }
        let volunteer_ids = volunteer_ids
            .iter()
            .map(|id| validate_id("volunteer", id))
            .collect::<Result<Vec<_>, _>>()?;

        let event = self.load_event(&event_id).await?;

        let volunteers = self
            .volunteers
            .find_by_ids(&volunteer_ids)
            .await
            .map_err(|e| MatchError::store(Step::LoadVolunteers, e))?;

        if volunteers.is_empty() {
            return Err(MatchError::VolunteersNotFound);
        }
        if volunteers.len() < volunteer_ids.len() {
            tracing::debug!(
                "Only {} of {} volunteer ids resolved for event {}",
                volunteers.len(),
                volunteer_ids.len(),
                event_id
            );
        }

        let ranked = self.matcher.rank(volunteers, &event.required_skills);
        let matched_at = Utc::now();

        let mut written = Vec::with_capacity(ranked.len());
        for candidate in &ranked {
            let record = MatchRecord::snapshot(&event, &candidate.volunteer, matched_at);

            match self.history.insert(record).await {
                Ok(saved) => written.push(saved),
                Err(source) => {
                    tracing::error!(
                        "Failed to record match for volunteer {} on event {} after {} writes: {}",
                        candidate.volunteer.id,
                        event_id,
                        written.len(),
                        source
                    );
                    return Err(MatchError::Store {
                        step: Step::PersistMatch {
                            volunteer_id: candidate.volunteer.id.clone(),
                        },
                        written,
                        source,
                    });
                }
            }
        }

        tracing::info!("Committed {} matches for event {}", written.len(), event_id);

        if self.options.notify_on_commit {
            self.notify_assigned(&event, &written).await;
        }

        Ok(written)
    }

    /// Best-effort assignment notifications; failures are only logged
    async fn notify_assigned(&self, event: &Event, records: &[MatchRecord]) {
        for record in records {
            let notification = Notification::assignment(&record.volunteer_id, event);
            if let Err(e) = self.notifications.insert(notification).await {
                tracing::warn!(
                    "Match recorded but notifying volunteer {} failed: {}",
                    record.volunteer_id,
                    e
                );
            }
        }
    }
}
