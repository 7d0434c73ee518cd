use crate::models::Event;
use crate::services::store::{EventDirectory, StoreResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Read-through cache in front of an event directory
///
/// Event lookups happen on every ranking and commit request while events
/// change rarely. Writes that go through this wrapper keep the cache
/// coherent; writes made directly against the inner store are only seen
/// once the entry expires.
pub struct CachedEventDirectory {
    inner: Arc<dyn EventDirectory>,
    cache: moka::future::Cache<String, Event>,
}

impl CachedEventDirectory {
    pub fn new(inner: Arc<dyn EventDirectory>, max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }
}

#[async_trait]
impl EventDirectory for CachedEventDirectory {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Event>> {
        if let Some(event) = self.cache.get(id).await {
            tracing::trace!("Event cache hit: {}", id);
            return Ok(Some(event));
        }

        tracing::trace!("Event cache miss: {}", id);
        let event = self.inner.find_by_id(id).await?;
        if let Some(event) = &event {
            self.cache.insert(id.to_string(), event.clone()).await;
        }

        Ok(event)
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        self.inner.list().await
    }

    async fn insert(&self, event: Event) -> StoreResult<Event> {
        let event = self.inner.insert(event).await?;
        self.cache.insert(event.id.clone(), event.clone()).await;
        Ok(event)
    }

    async fn update(&self, event: Event) -> StoreResult<Option<Event>> {
        let id = event.id.clone();
        let updated = self.inner.update(event).await?;
        match &updated {
            Some(event) => self.cache.insert(id, event.clone()).await,
            None => self.cache.invalidate(&id).await,
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let removed = self.inner.delete(id).await?;
        self.cache.invalidate(id).await;
        Ok(removed)
    }
}
