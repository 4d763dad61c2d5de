use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EventError, Result};
use crate::models::Event;

/// Repository trait for Event persistence
///
/// Events are created once and never updated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event. A duplicate slug is a persistence error.
    async fn create(&self, event: Event) -> Result<Event>;

    /// All events, newest first
    async fn list_all(&self) -> Result<Vec<Event>>;

    /// Exact slug match
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    /// Up to `limit` other events sharing at least one tag with `source`,
    /// in store order
    async fn find_similar(&self, source: &Event, limit: usize) -> Result<Vec<Event>>;

    /// Round-trip to the store, for readiness checks
    async fn ping(&self) -> Result<()>;
}

/// In-memory implementation for development and tests.
///
/// Insertion order stands in for the store's natural order.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> Result<Event> {
        let mut events = self.events.write().await;

        if events.iter().any(|e| e.slug == event.slug) {
            return Err(EventError::Persistence(format!(
                "duplicate key: slug '{}' already exists",
                event.slug
            )));
        }

        events.push(event.clone());
        tracing::info!(event_id = %event.id, slug = %event.slug, "Created event");
        Ok(event)
    }

    async fn list_all(&self) -> Result<Vec<Event>> {
        let events = self.events.read().await;

        // Later inserts win ties on created_at
        let mut result: Vec<Event> = events.iter().rev().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn find_similar(&self, source: &Event, limit: usize) -> Result<Vec<Event>> {
        let events = self.events.read().await;

        Ok(events
            .iter()
            .filter(|e| e.id != source.id && e.shares_tag_with(&source.tags))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
