//! # In-Memory Event Publisher
//!
//! Keeps every published event in memory. Intended for tests and for
//! inspecting what a use case emitted.

use crate::domain::events::{DomainEvent, ProcurementEvent};
use crate::infrastructure::events::publisher::{EventPublisher, PublishResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Event publisher that records events in publish order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    events: Arc<Mutex<Vec<ProcurementEvent>>>,
}

impl InMemoryEventPublisher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<ProcurementEvent> {
        self.events.lock().clone()
    }

    /// Returns the names of recorded events in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(DomainEvent::event_name).collect()
    }

    /// Returns how many recorded events carry the given name.
    #[must_use]
    pub fn count_named(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event_name() == name)
            .count()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: ProcurementEvent) -> PublishResult<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::events::{CloseReason, QuotationClosed};
    use crate::domain::value_objects::{ActorId, QuotationId, Timestamp};

    fn closed() -> ProcurementEvent {
        QuotationClosed::new(
            QuotationId::new_v4(),
            ActorId::new("admin"),
            "QT-000001",
            CloseReason::Manual,
            Timestamp::from_secs(1).unwrap(),
        )
        .into()
    }

    #[tokio::test]
    async fn records_in_order() {
        let publisher = InMemoryEventPublisher::new();
        publisher.publish_all(vec![closed(), closed()]).await.unwrap();

        assert_eq!(publisher.len(), 2);
        assert_eq!(publisher.count_named("quotation.closed"), 2);
        assert_eq!(publisher.event_names(), vec!["quotation.closed"; 2]);
    }

    #[tokio::test]
    async fn clones_share_the_log() {
        let publisher = InMemoryEventPublisher::new();
        let clone = publisher.clone();
        clone.publish(closed()).await.unwrap();
        assert_eq!(publisher.len(), 1);

        publisher.clear();
        assert!(clone.is_empty());
    }
}
