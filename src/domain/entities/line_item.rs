//! # Quotation Line Items
//!
//! One (item, requested quantity) pair within a quotation.
//!
//! Line items are authored through [`LineItemDraft`], either manually or from
//! stock request aggregation, and become immutable [`QuotationLineItem`]s when
//! the quotation is created.

use crate::domain::value_objects::{ItemId, LineItemId, Quantity, QuotationId, StockRequestItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line item as authored before quotation creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDraft {
    /// Catalogue item.
    pub item_id: ItemId,
    /// Requested quantity; must be positive.
    pub requested_quantity: Quantity,
    /// Unit of measure.
    pub unit_of_measure: String,
    /// Free-form specifications shown to retailers.
    #[serde(default)]
    pub specifications: Option<String>,
    /// Stock requests this line was aggregated from, in selection order.
    #[serde(default)]
    pub contributing_request_item_ids: Vec<StockRequestItemId>,
}

impl LineItemDraft {
    /// Creates a manually authored draft.
    #[must_use]
    pub fn new(
        item_id: ItemId,
        requested_quantity: Quantity,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            requested_quantity,
            unit_of_measure: unit_of_measure.into(),
            specifications: None,
            contributing_request_item_ids: Vec::new(),
        }
    }

    /// Sets specifications.
    #[must_use]
    pub fn with_specifications(mut self, specifications: impl Into<String>) -> Self {
        self.specifications = Some(specifications.into());
        self
    }

    /// Sets the contributing stock requests.
    #[must_use]
    pub fn with_contributing(mut self, ids: Vec<StockRequestItemId>) -> Self {
        self.contributing_request_item_ids = ids;
        self
    }
}

/// A line item of a created quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationLineItem {
    id: LineItemId,
    quotation_id: QuotationId,
    item_id: ItemId,
    requested_quantity: Quantity,
    unit_of_measure: String,
    specifications: Option<String>,
    contributing_request_item_ids: Vec<StockRequestItemId>,
}

impl QuotationLineItem {
    pub(crate) fn from_draft(quotation_id: QuotationId, draft: LineItemDraft) -> Self {
        Self {
            id: LineItemId::new_v4(),
            quotation_id,
            item_id: draft.item_id,
            requested_quantity: draft.requested_quantity,
            unit_of_measure: draft.unit_of_measure,
            specifications: draft.specifications,
            contributing_request_item_ids: draft.contributing_request_item_ids,
        }
    }

    /// Reconstructs a line item from storage without validation.
    #[must_use]
    pub fn from_parts(
        id: LineItemId,
        quotation_id: QuotationId,
        item_id: ItemId,
        requested_quantity: Quantity,
        unit_of_measure: String,
        specifications: Option<String>,
        contributing_request_item_ids: Vec<StockRequestItemId>,
    ) -> Self {
        Self {
            id,
            quotation_id,
            item_id,
            requested_quantity,
            unit_of_measure,
            specifications,
            contributing_request_item_ids,
        }
    }

    /// Returns the line item ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Returns the owning quotation.
    #[inline]
    #[must_use]
    pub fn quotation_id(&self) -> QuotationId {
        self.quotation_id
    }

    /// Returns the catalogue item.
    #[inline]
    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Returns the requested quantity.
    #[inline]
    #[must_use]
    pub fn requested_quantity(&self) -> Quantity {
        self.requested_quantity
    }

    /// Returns the unit of measure.
    #[inline]
    #[must_use]
    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    /// Returns the specifications, if any.
    #[must_use]
    pub fn specifications(&self) -> Option<&str> {
        self.specifications.as_deref()
    }

    /// Returns the contributing stock requests; empty for manual lines.
    #[inline]
    #[must_use]
    pub fn contributing_request_item_ids(&self) -> &[StockRequestItemId] {
        &self.contributing_request_item_ids
    }
}

impl fmt::Display for QuotationLineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LineItem({} {} {})",
            self.item_id, self.requested_quantity, self.unit_of_measure
        )
    }
}
