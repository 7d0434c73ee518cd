use crate::core::{is_eligible, VolunteerFilter};
use crate::models::{Event, HistoryQuery, MatchRecord, Notification, ProfileUpdate, Volunteer};
use crate::services::store::{
    EventDirectory, MatchHistoryStore, NotificationStore, StoreError, StoreResult, VolunteerDirectory,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory implementation of every store
///
/// Collections are kept in insertion order, which is the directory order
/// the matching service relies on. Read and write calls are counted, and
/// history inserts can be made to fail after a given number of successes.
#[derive(Debug)]
pub struct InMemoryStore {
    volunteers: RwLock<Vec<Volunteer>>,
    events: RwLock<Vec<Event>>,
    history: RwLock<Vec<MatchRecord>>,
    notifications: RwLock<Vec<Notification>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    history_insert_budget: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            volunteers: RwLock::new(Vec::new()),
            events: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
            notifications: RwLock::new(Vec::new()),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            history_insert_budget: AtomicUsize::new(usize::MAX),
        }
    }

    /// Number of read calls served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls attempted so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.read_count() + self.write_count()
    }

    /// Make history inserts fail once `successes` more have gone through
    pub fn fail_history_inserts_after(&self, successes: usize) {
        self.history_insert_budget.store(successes, Ordering::SeqCst);
    }

    /// Snapshot of every stored history record
    pub fn history_records(&self) -> Vec<MatchRecord> {
        self.history
            .read()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    fn read<'a, T>(&self, lock: &'a RwLock<T>) -> StoreResult<RwLockReadGuard<'a, T>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        lock.read()
            .map_err(|_| StoreError::Unavailable("Failed to acquire read lock".to_string()))
    }

    fn write<'a, T>(&self, lock: &'a RwLock<T>) -> StoreResult<RwLockWriteGuard<'a, T>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        lock.write()
            .map_err(|_| StoreError::Unavailable("Failed to acquire write lock".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VolunteerDirectory for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Volunteer>> {
        let volunteers = self.read(&self.volunteers)?;
        Ok(volunteers.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Volunteer>> {
        let volunteers = self.read(&self.volunteers)?;
        Ok(volunteers
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn find_candidates(&self, filter: &VolunteerFilter) -> StoreResult<Vec<Volunteer>> {
        let volunteers = self.read(&self.volunteers)?;
        Ok(volunteers
            .iter()
            .filter(|v| is_eligible(v, filter))
            .cloned()
            .collect())
    }

    async fn insert(&self, mut volunteer: Volunteer) -> StoreResult<Volunteer> {
        let mut volunteers = self.write(&self.volunteers)?;
        if let Some(email) = &volunteer.email {
            if volunteers.iter().any(|v| v.email.as_ref() == Some(email)) {
                return Err(StoreError::Conflict(format!("email {} already in use", email)));
            }
        }
        volunteer.created_at.get_or_insert_with(Utc::now);
        volunteers.push(volunteer.clone());
        Ok(volunteer)
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> StoreResult<Option<Volunteer>> {
        let mut volunteers = self.write(&self.volunteers)?;
        Ok(volunteers.iter_mut().find(|v| v.id == id).map(|volunteer| {
            update.apply(volunteer);
            volunteer.clone()
        }))
    }
}

#[async_trait]
impl EventDirectory for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Event>> {
        let events = self.read(&self.events)?;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        Ok(self.read(&self.events)?.clone())
    }

    async fn insert(&self, event: Event) -> StoreResult<Event> {
        let mut events = self.write(&self.events)?;
        events.push(event.clone());
        Ok(event)
    }

    async fn update(&self, event: Event) -> StoreResult<Option<Event>> {
        let mut events = self.write(&self.events)?;
        Ok(events.iter_mut().find(|e| e.id == event.id).map(|existing| {
            *existing = event;
            existing.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut events = self.write(&self.events)?;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }
}

#[async_trait]
impl MatchHistoryStore for InMemoryStore {
    async fn insert(&self, record: MatchRecord) -> StoreResult<MatchRecord> {
        let mut history = self.write(&self.history)?;

        let budget = self.history_insert_budget.load(Ordering::SeqCst);
        if budget == 0 {
            return Err(StoreError::Unavailable(format!(
                "history insert rejected for volunteer {}",
                record.volunteer_id
            )));
        }
        if budget != usize::MAX {
            self.history_insert_budget.store(budget - 1, Ordering::SeqCst);
        }

        history.push(record.clone());
        Ok(record)
    }

    async fn list(&self, query: &HistoryQuery) -> StoreResult<Vec<MatchRecord>> {
        let history = self.read(&self.history)?;
        Ok(history.iter().filter(|r| query.matches(r)).cloned().collect())
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert(&self, notification: Notification) -> StoreResult<Notification> {
        let mut notifications = self.write(&self.notifications)?;
        notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>> {
        let notifications = self.read(&self.notifications)?;
        let mut found: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        // newest first; stable so equal timestamps keep reverse insertion order
        found.reverse();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_read(&self, user_id: &str, id: &str) -> StoreResult<Option<Notification>> {
        let mut notifications = self.write(&self.notifications)?;
        Ok(notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .map(|notification| {
                notification.is_read = true;
                notification.clone()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            event_name: "Food Drive".to_string(),
            event_description: "Sort donations".to_string(),
            location: "Houston".to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            urgency: "Medium".to_string(),
            required_skills: vec!["Teamwork".to_string()],
        }
    }

    #[tokio::test]
    async fn test_event_crud() {
        let store = InMemoryStore::new();
        let event = create_event("64b8f9c01234567890abcdef");

        EventDirectory::insert(&store, event.clone()).await.unwrap();
        assert_eq!(EventDirectory::find_by_id(&store, &event.id).await.unwrap(), Some(event.clone()));

        let mut changed = event.clone();
        changed.urgency = "High".to_string();
        let updated = store.update(changed).await.unwrap().unwrap();
        assert_eq!(updated.urgency, "High");

        assert!(store.delete(&event.id).await.unwrap());
        assert!(!store.delete(&event.id).await.unwrap());
        assert!(EventDirectory::find_by_id(&store, &event.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_failure_injection() {
        let store = InMemoryStore::new();
        let event = create_event("64b8f9c01234567890abcdef");
        let volunteer = Volunteer {
            id: "64b8f9c01234567890abc001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: None,
            skills: vec![],
            volunteering_preferences: Default::default(),
            availability: None,
            created_at: None,
        };

        store.fail_history_inserts_after(1);
        let first = MatchRecord::snapshot(&event, &volunteer, Utc::now());
        let second = MatchRecord::snapshot(&event, &volunteer, Utc::now());

        assert!(MatchHistoryStore::insert(&store, first).await.is_ok());
        assert!(MatchHistoryStore::insert(&store, second).await.is_err());
        assert_eq!(store.history_records().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        let volunteer = |id: &str| Volunteer {
            id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            skills: vec![],
            volunteering_preferences: Default::default(),
            availability: None,
            created_at: None,
        };

        VolunteerDirectory::insert(&store, volunteer("64b8f9c01234567890abc001"))
            .await
            .unwrap();
        let duplicate = VolunteerDirectory::insert(&store, volunteer("64b8f9c01234567890abc002")).await;

        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
        assert!(VolunteerDirectory::find_by_id(&store, "64b8f9c01234567890abc002")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_counts_calls() {
        let store = InMemoryStore::new();
        assert_eq!(store.call_count(), 0);

        let _ = EventDirectory::find_by_id(&store, "64b8f9c01234567890abcdef").await;
        assert_eq!(store.read_count(), 1);
        assert_eq!(store.write_count(), 0);
    }
}
