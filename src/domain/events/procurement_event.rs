//! # Procurement Event Envelope
//!
//! A single enum over every concrete event, so publishers and subscribers can
//! carry events through one channel and serialize them with a stable tag.

use crate::domain::events::award_events::AwardCommitted;
use crate::domain::events::domain_event::{DomainEvent, EventType};
use crate::domain::events::quotation_events::{
    QuotationAwarded, QuotationCancelled, QuotationClosed, QuotationCreated, QuotationPublished,
};
use crate::domain::events::response_events::ResponseSubmitted;
use crate::domain::value_objects::{ActorId, EventId, QuotationId, Timestamp};
use serde::{Deserialize, Serialize};

/// Any procurement domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProcurementEvent {
    /// Draft quotation created.
    QuotationCreated(QuotationCreated),
    /// Quotation published.
    QuotationPublished(QuotationPublished),
    /// Response window ended.
    QuotationClosed(QuotationClosed),
    /// Quotation fully awarded.
    QuotationAwarded(QuotationAwarded),
    /// Quotation cancelled.
    QuotationCancelled(QuotationCancelled),
    /// Response submitted.
    ResponseSubmitted(ResponseSubmitted),
    /// Line item awarded.
    AwardCommitted(AwardCommitted),
}

impl ProcurementEvent {
    fn inner(&self) -> &dyn DomainEvent {
        match self {
            Self::QuotationCreated(e) => e,
            Self::QuotationPublished(e) => e,
            Self::QuotationClosed(e) => e,
            Self::QuotationAwarded(e) => e,
            Self::QuotationCancelled(e) => e,
            Self::ResponseSubmitted(e) => e,
            Self::AwardCommitted(e) => e,
        }
    }
}

impl DomainEvent for ProcurementEvent {
    fn event_id(&self) -> EventId {
        self.inner().event_id()
    }

    fn quotation_id(&self) -> QuotationId {
        self.inner().quotation_id()
    }

    fn actor_id(&self) -> &ActorId {
        self.inner().actor_id()
    }

    fn timestamp(&self) -> Timestamp {
        self.inner().timestamp()
    }

    fn event_type(&self) -> EventType {
        self.inner().event_type()
    }

    fn event_name(&self) -> &'static str {
        self.inner().event_name()
    }
}

macro_rules! impl_from_event {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for ProcurementEvent {
                fn from(event: $variant) -> Self {
                    Self::$variant(event)
                }
            }
        )+
    };
}

impl_from_event!(
    QuotationCreated,
    QuotationPublished,
    QuotationClosed,
    QuotationAwarded,
    QuotationCancelled,
    ResponseSubmitted,
    AwardCommitted,
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::events::CloseReason;

    #[test]
    fn envelope_delegates_to_inner_event() {
        let q = QuotationId::new_v4();
        let event: ProcurementEvent = QuotationClosed::new(
            q,
            ActorId::new("admin"),
            "QT-000003",
            CloseReason::DeadlineElapsed,
            Timestamp::from_secs(1).unwrap(),
        )
        .into();

        assert_eq!(event.quotation_id(), q);
        assert_eq!(event.event_name(), "quotation.closed");
        assert_eq!(event.actor_id().as_str(), "admin");
    }

    #[test]
    fn serializes_with_event_tag() {
        let event: ProcurementEvent = QuotationPublished::new(
            QuotationId::new_v4(),
            ActorId::new("admin"),
            "QT-000004",
            Timestamp::from_secs(10).unwrap(),
            1,
            Timestamp::from_secs(1).unwrap(),
        )
        .into();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "quotation_published");
        let back: ProcurementEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
