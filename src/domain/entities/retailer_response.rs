//! # Retailer Response
//!
//! A retailer's priced bid against some or all line items of a quotation.
//!
//! A response is owned by the [`Quotation`](crate::domain::entities::Quotation)
//! aggregate. There is at most one response per retailer per quotation, and
//! every resubmission replaces the full item set.
//!
//! Totals are derived from `unit_price × quantity` on read and are never taken
//! from the caller.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Amount, ArithmeticResult, LineItemId, Price, Quantity, QuotationId, ResponseId,
    ResponseItemId, ResponseStatus, RetailerId, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied price for one line item.
///
/// `quantity` defaults to the line item's requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseItemDraft {
    /// Line item being priced.
    pub line_item_id: LineItemId,
    /// Offered unit price.
    pub unit_price: Decimal,
    /// Offered quantity, if less than requested.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ResponseItemDraft {
    /// Creates a draft priced at `unit_price` for the full requested quantity.
    #[must_use]
    pub fn new(line_item_id: LineItemId, unit_price: Decimal) -> Self {
        Self {
            line_item_id,
            unit_price,
            quantity: None,
            notes: None,
        }
    }

    /// Sets an explicit quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// One priced line of a retailer response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseItem {
    id: ResponseItemId,
    response_id: ResponseId,
    line_item_id: LineItemId,
    unit_price: Price,
    quantity: Quantity,
    notes: Option<String>,
}

impl ResponseItem {
    /// Creates a response item.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if the quantity is not positive.
    /// Returns `DomainError::Arithmetic` if the derived total overflows.
    pub fn new(
        response_id: ResponseId,
        line_item_id: LineItemId,
        unit_price: Price,
        quantity: Quantity,
        notes: Option<String>,
    ) -> DomainResult<Self> {
        if !quantity.is_positive() {
            return Err(DomainError::InvalidQuantity(format!(
                "offered quantity for line item {line_item_id} must be positive"
            )));
        }
        unit_price.total_for(quantity)?;

        Ok(Self {
            id: ResponseItemId::new_v4(),
            response_id,
            line_item_id,
            unit_price,
            quantity,
            notes,
        })
    }

    /// Reconstructs a response item from storage without validation.
    #[must_use]
    pub fn from_parts(
        id: ResponseItemId,
        response_id: ResponseId,
        line_item_id: LineItemId,
        unit_price: Price,
        quantity: Quantity,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            response_id,
            line_item_id,
            unit_price,
            quantity,
            notes,
        }
    }

    /// Returns the response item ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ResponseItemId {
        self.id
    }

    /// Returns the owning response ID.
    #[inline]
    #[must_use]
    pub fn response_id(&self) -> ResponseId {
        self.response_id
    }

    /// Returns the priced line item.
    #[inline]
    #[must_use]
    pub fn line_item_id(&self) -> LineItemId {
        self.line_item_id
    }

    /// Returns the offered unit price.
    #[inline]
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Returns the offered quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns `unit_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the product overflows.
    pub fn total_amount(&self) -> ArithmeticResult<Amount> {
        self.unit_price.total_for(self.quantity)
    }
}

/// A retailer's response to a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerResponse {
    id: ResponseId,
    quotation_id: QuotationId,
    retailer_id: RetailerId,
    status: ResponseStatus,
    /// Time of the latest submit; `None` while only saved as draft.
    submitted_on: Option<Timestamp>,
    notes: Option<String>,
    items: Vec<ResponseItem>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl RetailerResponse {
    /// Creates an empty draft response.
    #[must_use]
    pub fn new(quotation_id: QuotationId, retailer_id: RetailerId, now: Timestamp) -> Self {
        Self {
            id: ResponseId::new_v4(),
            quotation_id,
            retailer_id,
            status: ResponseStatus::Draft,
            submitted_on: None,
            notes: None,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a response from storage without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ResponseId,
        quotation_id: QuotationId,
        retailer_id: RetailerId,
        status: ResponseStatus,
        submitted_on: Option<Timestamp>,
        notes: Option<String>,
        items: Vec<ResponseItem>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            quotation_id,
            retailer_id,
            status,
            submitted_on,
            notes,
            items,
            created_at,
            updated_at,
        }
    }

    /// Replaces the full item set.
    ///
    /// Items are validated by the owning quotation before this is called.
    pub(crate) fn replace(
        &mut self,
        items: Vec<ResponseItem>,
        notes: Option<String>,
        status: ResponseStatus,
        now: Timestamp,
    ) {
        self.items = items;
        self.notes = notes;
        self.status = status;
        if status == ResponseStatus::Submitted {
            self.submitted_on = Some(now);
        }
        self.updated_at = now;
    }

    // ========== Accessors ==========

    /// Returns the response ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ResponseId {
        self.id
    }

    /// Returns the quotation ID.
    #[inline]
    #[must_use]
    pub fn quotation_id(&self) -> QuotationId {
        self.quotation_id
    }

    /// Returns the responding retailer.
    #[inline]
    #[must_use]
    pub fn retailer_id(&self) -> &RetailerId {
        &self.retailer_id
    }

    /// Returns the response status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Returns true once the response has been submitted.
    #[inline]
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == ResponseStatus::Submitted
    }

    /// Returns the time of the latest submit.
    #[inline]
    #[must_use]
    pub fn submitted_on(&self) -> Option<Timestamp> {
        self.submitted_on
    }

    /// Returns the response notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the priced items.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ResponseItem] {
        &self.items
    }

    /// Finds an item by ID.
    #[must_use]
    pub fn item(&self, id: ResponseItemId) -> Option<&ResponseItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Finds the item pricing `line_item_id`.
    #[must_use]
    pub fn item_for_line(&self, line_item_id: LineItemId) -> Option<&ResponseItem> {
        self.items
            .iter()
            .find(|item| item.line_item_id() == line_item_id)
    }

    /// Returns when the response was first saved.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the response last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns Σ(unit_price × quantity) over all items.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the sum overflows.
    pub fn total_amount(&self) -> ArithmeticResult<Amount> {
        self.items
            .iter()
            .try_fold(Amount::ZERO, |acc, item| acc.safe_add(item.total_amount()?))
    }
}

impl fmt::Display for RetailerResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response({} {} items={} [{}])",
            self.id,
            self.retailer_id,
            self.items.len(),
            self.status
        )
    }
}
