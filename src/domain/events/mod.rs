//! # Domain Events
//!
//! Events emitted after committed changes, consumed by the external
//! notification system.
//!
//! ## Quotation Events
//!
//! - [`QuotationCreated`]: Draft quotation created
//! - [`QuotationPublished`]: Broadcast to retailers
//! - [`QuotationClosed`]: Response window ended
//! - [`QuotationAwarded`]: Every awardable line item has an award
//! - [`QuotationCancelled`]: Quotation withdrawn
//!
//! ## Response Events
//!
//! - [`ResponseSubmitted`]: Retailer submitted or resubmitted a response
//!
//! ## Award Events
//!
//! - [`AwardCommitted`]: Line item awarded or re-awarded

macro_rules! impl_domain_event {
    ($event:ty, $kind:expr, $name:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> EventId {
                self.metadata.event_id
            }

            fn quotation_id(&self) -> QuotationId {
                self.metadata.quotation_id
            }

            fn actor_id(&self) -> &ActorId {
                &self.metadata.actor_id
            }

            fn timestamp(&self) -> Timestamp {
                self.metadata.timestamp
            }

            fn event_type(&self) -> EventType {
                $kind
            }

            fn event_name(&self) -> &'static str {
                $name
            }
        }
    };
}

pub mod award_events;
pub mod domain_event;
pub mod procurement_event;
pub mod quotation_events;
pub mod response_events;

pub use award_events::AwardCommitted;
pub use domain_event::{DomainEvent, EventMetadata, EventType};
pub use procurement_event::ProcurementEvent;
pub use quotation_events::{
    CloseReason, QuotationAwarded, QuotationCancelled, QuotationClosed, QuotationCreated,
    QuotationPublished,
};
pub use response_events::ResponseSubmitted;
