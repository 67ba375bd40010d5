//! # Broadcast Event Publisher
//!
//! Fans events out to any number of subscribers over a
//! `tokio::sync::broadcast` channel. Delivery is best-effort: publishing with
//! no live subscriber is not an error, and slow subscribers may observe
//! `RecvError::Lagged`.

use crate::domain::events::{DomainEvent, ProcurementEvent};
use crate::infrastructure::events::publisher::{EventPublisher, PublishResult};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

/// Default channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event publisher backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<ProcurementEvent>,
}

impl BroadcastEventPublisher {
    /// Creates a publisher with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProcurementEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: ProcurementEvent) -> PublishResult<()> {
        let name = event.event_name();
        match self.sender.send(event) {
            Ok(receivers) => trace!(event = name, receivers, "event broadcast"),
            Err(_) => trace!(event = name, "no subscribers, event dropped"),
        }
        Ok(())
    }
}
