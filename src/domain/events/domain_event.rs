//! # Domain Event Trait
//!
//! Base trait for all domain events.
//!
//! Events are emitted after a change is committed and are consumed by the
//! external notification system. Each carries the affected quotation and the
//! actor who caused it.

use crate::domain::value_objects::{ActorId, EventId, QuotationId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Quotation lifecycle events.
    Quotation,
    /// Retailer response events.
    Response,
    /// Award events.
    Award,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quotation => write!(f, "QUOTATION"),
            Self::Response => write!(f, "RESPONSE"),
            Self::Award => write!(f, "AWARD"),
        }
    }
}

/// Trait for all domain events.
///
/// # Required Methods
///
/// - [`event_id`](DomainEvent::event_id) - Unique identifier for this event
/// - [`quotation_id`](DomainEvent::quotation_id) - The affected quotation
/// - [`actor_id`](DomainEvent::actor_id) - Who caused the event
/// - [`timestamp`](DomainEvent::timestamp) - When the event occurred
/// - [`event_type`](DomainEvent::event_type) - Category of the event
/// - [`event_name`](DomainEvent::event_name) - Dotted event name, e.g. `quotation.closed`
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the unique identifier for this event.
    fn event_id(&self) -> EventId;

    /// Returns the affected quotation.
    fn quotation_id(&self) -> QuotationId;

    /// Returns the actor who caused the event.
    fn actor_id(&self) -> &ActorId;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Timestamp;

    /// Returns the type/category of this event.
    fn event_type(&self) -> EventType;

    /// Returns the dotted event name.
    fn event_name(&self) -> &'static str;
}

/// Common metadata embedded in every concrete event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The affected quotation.
    pub quotation_id: QuotationId,
    /// Who caused the event.
    pub actor_id: ActorId,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates metadata with a generated event ID.
    #[must_use]
    pub fn new(quotation_id: QuotationId, actor_id: ActorId, timestamp: Timestamp) -> Self {
        Self {
            event_id: EventId::new_v4(),
            quotation_id,
            actor_id,
            timestamp,
        }
    }

    /// Creates event metadata with specific values (for reconstruction).
    #[must_use]
    pub fn from_parts(
        event_id: EventId,
        quotation_id: QuotationId,
        actor_id: ActorId,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            event_id,
            quotation_id,
            actor_id,
            timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn event_type_display() {
        assert_eq!(EventType::Quotation.to_string(), "QUOTATION");
        assert_eq!(EventType::Response.to_string(), "RESPONSE");
        assert_eq!(EventType::Award.to_string(), "AWARD");
    }

    #[test]
    fn metadata_generates_distinct_ids() {
        let q = QuotationId::new_v4();
        let at = Timestamp::from_secs(100).unwrap();
        let a = EventMetadata::new(q, ActorId::new("admin"), at);
        let b = EventMetadata::new(q, ActorId::new("admin"), at);
        assert_ne!(a.event_id, b.event_id);
        assert_eq!(a.quotation_id, q);
    }

    #[test]
    fn metadata_serde_roundtrip() {
        let metadata = EventMetadata::new(
            QuotationId::new_v4(),
            ActorId::new("retailer-7"),
            Timestamp::from_secs(100).unwrap(),
        );
        let json = serde_json::to_string(&metadata).unwrap();
        let back: EventMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, back);
    }
}
