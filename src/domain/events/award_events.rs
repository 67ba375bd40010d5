//! # Award Events
//!
//! One [`AwardCommitted`] is emitted per line item in a committed award batch.
//! When the commit overwrote an earlier award, the previous winner is carried
//! along so the audit trail can record the change.

use crate::domain::entities::AwardChange;
use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::{
    ActorId, EventId, LineItemId, QuotationId, ResponseItemId, RetailerId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Event emitted when a line item is awarded or re-awarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardCommitted {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Awarded line item.
    pub line_item_id: LineItemId,
    /// Winning response item.
    pub response_item_id: ResponseItemId,
    /// Winning retailer.
    pub retailer_id: RetailerId,
    /// Retailer of the overwritten award, if any.
    pub previous_retailer_id: Option<RetailerId>,
    /// Response item of the overwritten award, if any.
    pub previous_response_item_id: Option<ResponseItemId>,
}

impl AwardCommitted {
    /// Creates an event from a committed change.
    #[must_use]
    pub fn from_change(quotation_id: QuotationId, change: &AwardChange) -> Self {
        let award = &change.award;
        Self {
            metadata: EventMetadata::new(
                quotation_id,
                award.awarded_by().clone(),
                award.awarded_on(),
            ),
            line_item_id: award.line_item_id(),
            response_item_id: award.response_item_id(),
            retailer_id: award.retailer_id().clone(),
            previous_retailer_id: change.previous.as_ref().map(|p| p.retailer_id().clone()),
            previous_response_item_id: change.previous.as_ref().map(|p| p.response_item_id()),
        }
    }

    /// Returns true if the line item changed hands.
    #[must_use]
    pub fn is_reassignment(&self) -> bool {
        self.previous_retailer_id
            .as_ref()
            .is_some_and(|previous| previous != &self.retailer_id)
    }
}

impl_domain_event!(AwardCommitted, EventType::Award, "award.committed");
