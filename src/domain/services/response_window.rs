//! # Response Window
//!
//! The one place that decides whether a quotation is still accepting retailer
//! responses.
//!
//! "Expired" is never stored. A quotation whose status is `Published` and whose
//! `validity_until` has passed is treated as expired by [`is_expired`], and
//! every component that gates on the response window goes through this module.
//! Expiry is therefore enforced lazily at the moment of each call.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::entities::Quotation;
//! use procurement_rfq::domain::services::response_window::{self, ResponseWindow};
//! use procurement_rfq::domain::value_objects::{ActorId, Timestamp};
//!
//! let now = Timestamp::from_secs(1_704_067_200).unwrap();
//! let quotation = Quotation::builder("QT-000001", "Weekly", ActorId::new("admin"), now.add_days(2))
//!     .build(now)
//!     .unwrap();
//!
//! assert_eq!(response_window::window(&quotation, now), ResponseWindow::NotPublished);
//! assert!(!response_window::is_expired(&quotation, now.add_days(3)));
//! ```

use crate::domain::entities::Quotation;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{QuotationStatus, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived view of a quotation's response window at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseWindow {
    /// Still a draft; retailers cannot see it yet.
    NotPublished,
    /// Published and before the deadline.
    Open,
    /// Published but past the deadline.
    Expired,
    /// Closed by the admin or already awarded.
    Closed,
    /// Withdrawn.
    Cancelled,
}

impl ResponseWindow {
    /// Returns true if retailers may submit or edit responses.
    #[inline]
    #[must_use]
    pub const fn accepts_responses(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns true if the candidate pool is final, so comparison and award
    /// are meaningful.
    #[inline]
    #[must_use]
    pub const fn allows_award(&self) -> bool {
        matches!(self, Self::Expired | Self::Closed)
    }
}

impl fmt::Display for ResponseWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotPublished => "NOT_PUBLISHED",
            Self::Open => "OPEN",
            Self::Expired => "EXPIRED",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Returns true if the quotation is published and `now` is past its deadline.
#[must_use]
pub fn is_expired(quotation: &Quotation, now: Timestamp) -> bool {
    quotation.status() == QuotationStatus::Published && now.is_after(&quotation.validity_until())
}

/// Returns the response window of `quotation` at `now`.
#[must_use]
pub fn window(quotation: &Quotation, now: Timestamp) -> ResponseWindow {
    match quotation.status() {
        QuotationStatus::Draft => ResponseWindow::NotPublished,
        QuotationStatus::Published if is_expired(quotation, now) => ResponseWindow::Expired,
        QuotationStatus::Published => ResponseWindow::Open,
        QuotationStatus::Closed | QuotationStatus::Awarded => ResponseWindow::Closed,
        QuotationStatus::Cancelled => ResponseWindow::Cancelled,
    }
}

/// Checks that retailer responses may be written.
///
/// # Errors
///
/// Returns `DomainError::QuotationClosed` for draft or cancelled quotations.
/// Returns `DomainError::ResponseWindowClosed` for closed, awarded or expired
/// quotations.
pub fn ensure_accepting_responses(quotation: &Quotation, now: Timestamp) -> DomainResult<()> {
    match window(quotation, now) {
        ResponseWindow::Open => Ok(()),
        ResponseWindow::NotPublished | ResponseWindow::Cancelled => {
            Err(DomainError::QuotationClosed(quotation.status()))
        }
        ResponseWindow::Expired | ResponseWindow::Closed => Err(DomainError::ResponseWindowClosed),
    }
}

/// Checks that the candidate pool is final.
///
/// # Errors
///
/// Returns `DomainError::QuotationStillOpen` while the window is open.
/// Returns `DomainError::InvalidTransition` for draft or cancelled quotations,
/// which can never be awarded.
pub fn ensure_window_closed(quotation: &Quotation, now: Timestamp) -> DomainResult<()> {
    match window(quotation, now) {
        ResponseWindow::Expired | ResponseWindow::Closed => Ok(()),
        ResponseWindow::Open => Err(DomainError::QuotationStillOpen),
        ResponseWindow::NotPublished | ResponseWindow::Cancelled => {
            Err(DomainError::InvalidTransition {
                from: quotation.status(),
                to: QuotationStatus::Awarded,
            })
        }
    }
}
