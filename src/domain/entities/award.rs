//! # Award
//!
//! The admin's binding selection of one winning response item for a line item.
//!
//! Awards are owned by the [`Quotation`](crate::domain::entities::Quotation)
//! aggregate, which keeps at most one award per line item. Re-awarding a line
//! item replaces its award.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::entities::Award;
//! use procurement_rfq::domain::value_objects::{
//!     ActorId, LineItemId, ResponseItemId, RetailerId, Timestamp,
//! };
//!
//! let award = Award::new(
//!     LineItemId::new_v4(),
//!     ResponseItemId::new_v4(),
//!     RetailerId::new("retailer-2"),
//!     ActorId::new("admin-1"),
//!     Timestamp::now(),
//! );
//!
//! assert_eq!(award.retailer_id().as_str(), "retailer-2");
//! ```

use crate::domain::value_objects::{
    ActorId, LineItemId, ResponseItemId, RetailerId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A committed award for one quotation line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    line_item_id: LineItemId,
    response_item_id: ResponseItemId,
    /// Denormalized from the awarded response.
    retailer_id: RetailerId,
    awarded_by: ActorId,
    awarded_on: Timestamp,
}

impl Award {
    /// Creates an award.
    #[must_use]
    pub fn new(
        line_item_id: LineItemId,
        response_item_id: ResponseItemId,
        retailer_id: RetailerId,
        awarded_by: ActorId,
        awarded_on: Timestamp,
    ) -> Self {
        Self {
            line_item_id,
            response_item_id,
            retailer_id,
            awarded_by,
            awarded_on,
        }
    }

    /// Returns the awarded line item.
    #[inline]
    #[must_use]
    pub fn line_item_id(&self) -> LineItemId {
        self.line_item_id
    }

    /// Returns the winning response item.
    #[inline]
    #[must_use]
    pub fn response_item_id(&self) -> ResponseItemId {
        self.response_item_id
    }

    /// Returns the winning retailer.
    #[inline]
    #[must_use]
    pub fn retailer_id(&self) -> &RetailerId {
        &self.retailer_id
    }

    /// Returns the admin who committed the award.
    #[inline]
    #[must_use]
    pub fn awarded_by(&self) -> &ActorId {
        &self.awarded_by
    }

    /// Returns when the award was committed.
    #[inline]
    #[must_use]
    pub fn awarded_on(&self) -> Timestamp {
        self.awarded_on
    }
}

impl fmt::Display for Award {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Award({} -> {} @ {})",
            self.line_item_id, self.response_item_id, self.retailer_id
        )
    }
}

/// Admin selection of a winning response item for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AwardSelection {
    /// Line item to award.
    pub line_item_id: LineItemId,
    /// Winning response item.
    pub response_item_id: ResponseItemId,
}

impl AwardSelection {
    /// Creates a selection.
    #[must_use]
    pub fn new(line_item_id: LineItemId, response_item_id: ResponseItemId) -> Self {
        Self {
            line_item_id,
            response_item_id,
        }
    }
}

/// An award committed by one allocation call, with the award it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardChange {
    /// The committed award.
    pub award: Award,
    /// The award it overwrote, if the line item was already awarded.
    pub previous: Option<Award>,
}

impl AwardChange {
    /// Returns true if this change overwrote an earlier award.
    #[must_use]
    pub fn is_reaward(&self) -> bool {
        self.previous.is_some()
    }
}
