//! # Domain Errors
//!
//! Business rule violations raised by entities and domain services.
//!
//! Every variant is classified into an [`ErrorKind`] so the service layer can
//! translate failures into actor-facing messages without matching on
//! individual variants.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::errors::{DomainError, ErrorKind};
//!
//! let err = DomainError::QuotationStillOpen;
//! assert_eq!(err.kind(), ErrorKind::StateConflict);
//! assert_eq!(err.code(), "QUOTATION_STILL_OPEN");
//! ```

use crate::domain::value_objects::{
    ArithmeticError, LineItemId, QuotationStatus, RetailerId, StockRequestItemId,
    StockRequestStatus,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure classification shared by domain and application errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or out-of-range input; the caller fixes and retries.
    Validation,
    /// Operation not valid for the current status.
    StateConflict,
    /// Unknown identifier.
    NotFound,
    /// Cross-entity mismatch indicating a client bug.
    Integrity,
    /// Caller lacks the capability for the operation.
    Unauthorized,
    /// Infrastructure or unexpected failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "VALIDATION",
            Self::StateConflict => "STATE_CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Integrity => "INTEGRITY",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal => "INTERNAL",
        };
        write!(f, "{s}")
    }
}

/// Domain error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Generic input validation failure.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Price is zero, negative or otherwise unusable.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Quantity is out of range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Stock request selection references unknown or non-pending items.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Quotation has no line items.
    #[error("quotation has no line items")]
    EmptyQuotation,

    /// Deadline is not in the future.
    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    /// Quotation status transition is not allowed.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: QuotationStatus,
        /// Requested status.
        to: QuotationStatus,
    },

    /// Stock request status transition is not allowed.
    #[error("stock request {id} cannot move from {from} to {to}")]
    InvalidStockRequestTransition {
        /// Stock request item.
        id: StockRequestItemId,
        /// Current status.
        from: StockRequestStatus,
        /// Requested status.
        to: StockRequestStatus,
    },

    /// Quotation is not accepting responses (draft or cancelled).
    #[error("quotation is not accepting responses (status {0})")]
    QuotationClosed(QuotationStatus),

    /// Response window is over (closed, awarded or deadline elapsed).
    #[error("response window is closed")]
    ResponseWindowClosed,

    /// A draft save would overwrite a response that was already submitted.
    #[error("response from {0} is already submitted; resubmit to change it")]
    ResponseAlreadySubmitted(RetailerId),

    /// Comparison or award attempted while responses are still being accepted.
    #[error("quotation is still open for responses")]
    QuotationStillOpen,

    /// Submission or award batch is empty.
    #[error("no items selected")]
    NoItemsSelected,

    /// Line item does not belong to the quotation.
    #[error("unknown line item: {0}")]
    UnknownLineItem(LineItemId),

    /// Line item referenced twice in one submission.
    #[error("duplicate line item: {0}")]
    DuplicateLineItem(LineItemId),

    /// Award selection does not match a submitted response item of the line.
    #[error("invalid award: {0}")]
    InvalidAward(String),

    /// Decimal arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Creates an invalid selection error.
    #[must_use]
    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::InvalidSelection(message.into())
    }

    /// Creates an invalid award error.
    #[must_use]
    pub fn invalid_award(message: impl Into<String>) -> Self {
        Self::InvalidAward(message.into())
    }

    /// Returns the taxonomy class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError(_)
            | Self::InvalidPrice(_)
            | Self::InvalidQuantity(_)
            | Self::InvalidSelection(_)
            | Self::EmptyQuotation
            | Self::InvalidDeadline(_)
            | Self::NoItemsSelected
            | Self::UnknownLineItem(_)
            | Self::DuplicateLineItem(_)
            | Self::Arithmetic(_) => ErrorKind::Validation,
            Self::InvalidTransition { .. }
            | Self::InvalidStockRequestTransition { .. }
            | Self::QuotationClosed(_)
            | Self::ResponseWindowClosed
            | Self::ResponseAlreadySubmitted(_)
            | Self::QuotationStillOpen => ErrorKind::StateConflict,
            Self::InvalidAward(_) => ErrorKind::Integrity,
        }
    }

    /// Returns a stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidPrice(_) => "INVALID_PRICE",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidSelection(_) => "INVALID_SELECTION",
            Self::EmptyQuotation => "EMPTY_QUOTATION",
            Self::InvalidDeadline(_) => "INVALID_DEADLINE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InvalidStockRequestTransition { .. } => "INVALID_STOCK_REQUEST_TRANSITION",
            Self::QuotationClosed(_) => "QUOTATION_CLOSED",
            Self::ResponseWindowClosed => "RESPONSE_WINDOW_CLOSED",
            Self::ResponseAlreadySubmitted(_) => "RESPONSE_ALREADY_SUBMITTED",
            Self::QuotationStillOpen => "QUOTATION_STILL_OPEN",
            Self::NoItemsSelected => "NO_ITEMS_SELECTED",
            Self::UnknownLineItem(_) => "UNKNOWN_LINE_ITEM",
            Self::DuplicateLineItem(_) => "DUPLICATE_LINE_ITEM",
            Self::InvalidAward(_) => "INVALID_AWARD",
            Self::Arithmetic(_) => "ARITHMETIC_ERROR",
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
