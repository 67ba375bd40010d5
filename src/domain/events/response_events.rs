//! # Response Events
//!
//! Events emitted by the retailer response ledger. Draft saves emit nothing.

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::{
    ActorId, Amount, EventId, QuotationId, ResponseId, RetailerId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Event emitted when a retailer submits or resubmits a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSubmitted {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The response.
    pub response_id: ResponseId,
    /// The submitting retailer.
    pub retailer_id: RetailerId,
    /// Number of priced line items.
    pub item_count: usize,
    /// Derived response total.
    pub total_amount: Amount,
    /// True if this replaced an earlier submission.
    pub resubmission: bool,
}

impl ResponseSubmitted {
    /// Creates a new ResponseSubmitted event.
    #[must_use]
    pub fn new(
        quotation_id: QuotationId,
        response_id: ResponseId,
        retailer_id: RetailerId,
        item_count: usize,
        total_amount: Amount,
        resubmission: bool,
        at: Timestamp,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(quotation_id, ActorId::from(&retailer_id), at),
            response_id,
            retailer_id,
            item_count,
            total_amount,
            resubmission,
        }
    }
}

impl_domain_event!(ResponseSubmitted, EventType::Response, "response.submitted");
