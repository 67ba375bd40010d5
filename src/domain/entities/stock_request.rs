//! # Stock Request Item
//!
//! A store's ask for replenishment of one catalogue item.
//!
//! # Lifecycle
//!
//! ```text
//! Pending → Quoted → Fulfilled
//!             ↓
//!          Pending (owning quotation cancelled)
//! ```
//!
//! The requested quantity is fixed at creation and never changes.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::entities::StockRequestItem;
//! use procurement_rfq::domain::value_objects::{
//!     ItemId, Quantity, StockRequestStatus, StoreId, Timestamp,
//! };
//! use rust_decimal::Decimal;
//!
//! let item = StockRequestItem::new(
//!     StoreId::new("store-1"),
//!     ItemId::new("rice-5kg"),
//!     Quantity::new(Decimal::new(12, 0)).unwrap(),
//!     "bag",
//!     Timestamp::now(),
//! )
//! .unwrap();
//!
//! assert_eq!(item.status(), StockRequestStatus::Pending);
//! assert!(item.quotation_id().is_none());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    ItemId, Quantity, QuotationId, StockRequestItemId, StockRequestStatus, StoreId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single stock request line raised by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequestItem {
    id: StockRequestItemId,
    store_id: StoreId,
    item_id: ItemId,
    quantity: Quantity,
    unit_of_measure: String,
    status: StockRequestStatus,
    /// Quotation currently covering this request, set while quoted or fulfilled.
    quotation_id: Option<QuotationId>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl StockRequestItem {
    /// Creates a pending stock request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if the quantity is not positive.
    /// Returns `DomainError::ValidationError` if the unit of measure is blank.
    pub fn new(
        store_id: StoreId,
        item_id: ItemId,
        quantity: Quantity,
        unit_of_measure: impl Into<String>,
        now: Timestamp,
    ) -> DomainResult<Self> {
        if !quantity.is_positive() {
            return Err(DomainError::InvalidQuantity(
                "requested quantity must be positive".to_string(),
            ));
        }
        let unit_of_measure = unit_of_measure.into();
        if unit_of_measure.trim().is_empty() {
            return Err(DomainError::validation("unit of measure is required"));
        }
        if item_id.as_str().trim().is_empty() {
            return Err(DomainError::validation("item id is required"));
        }

        Ok(Self {
            id: StockRequestItemId::new_v4(),
            store_id,
            item_id,
            quantity,
            unit_of_measure,
            status: StockRequestStatus::Pending,
            quotation_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a stock request from storage without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: StockRequestItemId,
        store_id: StoreId,
        item_id: ItemId,
        quantity: Quantity,
        unit_of_measure: String,
        status: StockRequestStatus,
        quotation_id: Option<QuotationId>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            store_id,
            item_id,
            quantity,
            unit_of_measure,
            status,
            quotation_id,
            created_at,
            updated_at,
        }
    }

    // ========== Accessors ==========

    /// Returns the stock request ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> StockRequestItemId {
        self.id
    }

    /// Returns the requesting store.
    #[inline]
    #[must_use]
    pub fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    /// Returns the requested catalogue item.
    #[inline]
    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Returns the requested quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the unit of measure.
    #[inline]
    #[must_use]
    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StockRequestStatus {
        self.status
    }

    /// Returns the quotation covering this request, if any.
    #[inline]
    #[must_use]
    pub fn quotation_id(&self) -> Option<QuotationId> {
        self.quotation_id
    }

    /// Returns when the request was raised.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the request last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true while the request awaits aggregation.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == StockRequestStatus::Pending
    }

    // ========== State Transitions ==========

    /// Marks the request as covered by a published quotation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStockRequestTransition` unless pending.
    pub fn mark_quoted(&mut self, quotation_id: QuotationId, now: Timestamp) -> DomainResult<()> {
        self.transition_to(StockRequestStatus::Quoted, now)?;
        self.quotation_id = Some(quotation_id);
        Ok(())
    }

    /// Returns the request to the pending pool after its quotation was cancelled.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStockRequestTransition` unless quoted.
    pub fn release(&mut self, now: Timestamp) -> DomainResult<()> {
        self.transition_to(StockRequestStatus::Pending, now)?;
        self.quotation_id = None;
        Ok(())
    }

    /// Marks the request as fulfilled by an award.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStockRequestTransition` unless quoted.
    pub fn mark_fulfilled(&mut self, now: Timestamp) -> DomainResult<()> {
        self.transition_to(StockRequestStatus::Fulfilled, now)
    }

    fn transition_to(&mut self, target: StockRequestStatus, now: Timestamp) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStockRequestTransition {
                id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}

impl fmt::Display for StockRequestItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StockRequest({} {} {} {} [{}])",
            self.id, self.store_id, self.quantity, self.item_id, self.status
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn now() -> Timestamp {
        Timestamp::from_secs(1_704_067_200).unwrap()
    }

    fn pending(qty: rust_decimal::Decimal) -> StockRequestItem {
        StockRequestItem::new(
            StoreId::new("store-1"),
            ItemId::new("flour-1kg"),
            Quantity::new(qty).unwrap(),
            "pack",
            now(),
        )
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_pending() {
            let item = pending(dec!(4));
            assert!(item.is_pending());
            assert_eq!(item.quantity().get(), dec!(4));
            assert_eq!(item.unit_of_measure(), "pack");
        }

        #[test]
        fn rejects_zero_quantity() {
            let result = StockRequestItem::new(
                StoreId::new("s"),
                ItemId::new("i"),
                Quantity::zero(),
                "kg",
                now(),
            );
            assert!(matches!(result, Err(DomainError::InvalidQuantity(_))));
        }

        #[test]
        fn rejects_blank_unit() {
            let result = StockRequestItem::new(
                StoreId::new("s"),
                ItemId::new("i"),
                Quantity::new(dec!(1)).unwrap(),
                "  ",
                now(),
            );
            assert!(matches!(result, Err(DomainError::ValidationError(_))));
        }
    }

    mod state_transitions {
        use super::*;

        #[test]
        fn quote_then_fulfil() {
            let mut item = pending(dec!(2));
            let quotation = QuotationId::new_v4();
            item.mark_quoted(quotation, now().add_secs(1)).unwrap();
            assert_eq!(item.status(), StockRequestStatus::Quoted);
            assert_eq!(item.quotation_id(), Some(quotation));

            item.mark_fulfilled(now().add_secs(2)).unwrap();
            assert_eq!(item.status(), StockRequestStatus::Fulfilled);
            assert_eq!(item.quotation_id(), Some(quotation));
            assert_eq!(item.updated_at(), now().add_secs(2));
        }

        #[test]
        fn release_clears_quotation() {
            let mut item = pending(dec!(2));
            item.mark_quoted(QuotationId::new_v4(), now()).unwrap();
            item.release(now()).unwrap();
            assert!(item.is_pending());
            assert!(item.quotation_id().is_none());
        }

        #[test]
        fn cannot_quote_twice() {
            let mut item = pending(dec!(2));
            item.mark_quoted(QuotationId::new_v4(), now()).unwrap();
            let err = item.mark_quoted(QuotationId::new_v4(), now()).unwrap_err();
            assert!(matches!(
                err,
                DomainError::InvalidStockRequestTransition {
                    from: StockRequestStatus::Quoted,
                    to: StockRequestStatus::Quoted,
                    ..
                }
            ));
        }

        #[test]
        fn pending_cannot_be_fulfilled() {
            let mut item = pending(dec!(2));
            assert!(item.mark_fulfilled(now()).is_err());
            assert!(item.is_pending());
        }
    }
}
