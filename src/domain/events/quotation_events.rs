//! # Quotation Events
//!
//! Lifecycle events of a quotation.
//!
//! # Event Flow
//!
//! ```text
//! quotation.created -> quotation.published -> quotation.closed -> quotation.awarded
//!
//! Before award: quotation.cancelled
//! ```

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::{ActorId, EventId, QuotationId, Timestamp};
use serde::{Deserialize, Serialize};

/// Event emitted when a draft quotation is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationCreated {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Quotation number.
    pub number: String,
    /// Number of line items.
    pub line_item_count: usize,
    /// Number of stock requests aggregated into the quotation.
    pub contributing_request_count: usize,
}

impl QuotationCreated {
    /// Creates a new QuotationCreated event.
    #[must_use]
    pub fn new(
        quotation_id: QuotationId,
        actor_id: ActorId,
        number: impl Into<String>,
        line_item_count: usize,
        contributing_request_count: usize,
        at: Timestamp,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(quotation_id, actor_id, at),
            number: number.into(),
            line_item_count,
            contributing_request_count,
        }
    }
}

impl_domain_event!(QuotationCreated, EventType::Quotation, "quotation.created");

/// Event emitted when a quotation is broadcast to retailers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationPublished {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Quotation number.
    pub number: String,
    /// Response deadline.
    pub validity_until: Timestamp,
    /// Number of line items.
    pub line_item_count: usize,
}

impl QuotationPublished {
    /// Creates a new QuotationPublished event.
    #[must_use]
    pub fn new(
        quotation_id: QuotationId,
        actor_id: ActorId,
        number: impl Into<String>,
        validity_until: Timestamp,
        line_item_count: usize,
        at: Timestamp,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(quotation_id, actor_id, at),
            number: number.into(),
            validity_until,
            line_item_count,
        }
    }
}

impl_domain_event!(QuotationPublished, EventType::Quotation, "quotation.published");

/// How the response window ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloseReason {
    /// Closed early by the admin.
    Manual,
    /// Deadline passed; recorded by the first award commit.
    DeadlineElapsed,
}

/// Event emitted when a quotation stops accepting responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationClosed {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Quotation number.
    pub number: String,
    /// Why the window ended.
    pub reason: CloseReason,
}

impl QuotationClosed {
    /// Creates a new QuotationClosed event.
    #[must_use]
    pub fn new(
        quotation_id: QuotationId,
        actor_id: ActorId,
        number: impl Into<String>,
        reason: CloseReason,
        at: Timestamp,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(quotation_id, actor_id, at),
            number: number.into(),
            reason,
        }
    }
}

impl_domain_event!(QuotationClosed, EventType::Quotation, "quotation.closed");

/// Event emitted when every awardable line item has an award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationAwarded {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Quotation number.
    pub number: String,
    /// Number of awarded line items.
    pub awarded_line_items: usize,
}

impl QuotationAwarded {
    /// Creates a new QuotationAwarded event.
    #[must_use]
    pub fn new(
        quotation_id: QuotationId,
        actor_id: ActorId,
        number: impl Into<String>,
        awarded_line_items: usize,
        at: Timestamp,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(quotation_id, actor_id, at),
            number: number.into(),
            awarded_line_items,
        }
    }
}

impl_domain_event!(QuotationAwarded, EventType::Quotation, "quotation.awarded");

/// Event emitted when a quotation is withdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationCancelled {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Quotation number.
    pub number: String,
    /// Stock requests returned to the pending pool.
    pub released_requests: usize,
}

impl QuotationCancelled {
    /// Creates a new QuotationCancelled event.
    #[must_use]
    pub fn new(
        quotation_id: QuotationId,
        actor_id: ActorId,
        number: impl Into<String>,
        released_requests: usize,
        at: Timestamp,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(quotation_id, actor_id, at),
            number: number.into(),
            released_requests,
        }
    }
}

impl_domain_event!(QuotationCancelled, EventType::Quotation, "quotation.cancelled");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        Timestamp::from_millis(1_704_067_200_000).unwrap()
    }

    #[test]
    fn names_follow_dotted_convention() {
        let q = QuotationId::new_v4();
        let admin = ActorId::new("admin");
        let published = QuotationPublished::new(q, admin.clone(), "QT-000001", at(), 2, at());
        let closed = QuotationClosed::new(q, admin.clone(), "QT-000001", CloseReason::Manual, at());
        let awarded = QuotationAwarded::new(q, admin, "QT-000001", 2, at());

        assert_eq!(published.event_name(), "quotation.published");
        assert_eq!(closed.event_name(), "quotation.closed");
        assert_eq!(awarded.event_name(), "quotation.awarded");
        assert_eq!(closed.event_type(), EventType::Quotation);
    }

    #[test]
    fn carries_quotation_and_actor() {
        let q = QuotationId::new_v4();
        let event = QuotationCancelled::new(q, ActorId::new("admin-2"), "QT-000009", 3, at());
        assert_eq!(event.quotation_id(), q);
        assert_eq!(event.actor_id().as_str(), "admin-2");
        assert_eq!(event.released_requests, 3);
    }
}
