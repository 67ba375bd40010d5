//! # Event Publisher Port

use crate::domain::events::ProcurementEvent;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for event publishing.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The underlying channel is closed.
    #[error("Event channel closed: {0}")]
    Closed(String),

    /// The event could not be encoded for transport.
    #[error("Event serialization failed: {0}")]
    Serialization(String),
}

impl PublishError {
    /// Creates a closed channel error.
    #[must_use]
    pub fn closed(msg: impl Into<String>) -> Self {
        Self::Closed(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

/// Result type for event publishing.
pub type PublishResult<T> = Result<T, PublishError>;

/// Outbound port for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Publishes a single event.
    async fn publish(&self, event: ProcurementEvent) -> PublishResult<()>;

    /// Publishes events in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<ProcurementEvent>) -> PublishResult<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
