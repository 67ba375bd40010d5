//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`QuotationId`], [`LineItemId`], [`ResponseId`], [`ResponseItemId`],
//!   [`StockRequestItemId`], [`EventId`]: UUID-based identifiers
//! - [`StoreId`], [`RetailerId`], [`ItemId`], [`ActorId`]: String-based identifiers
//!
//! ## Numeric Types
//!
//! - [`Price`]: Strictly positive unit price
//! - [`Amount`]: Derived monetary total
//! - [`Quantity`]: Non-negative decimal quantity
//!
//! ## Lifecycle
//!
//! - [`QuotationStatus`]: Quotation state machine
//! - [`StockRequestStatus`], [`ResponseStatus`]: Entity statuses
//! - [`Timestamp`]: UTC point in time

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod price;
pub mod quantity;
pub mod quotation_status;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic, checked_sum};
pub use enums::{ParseEnumError, QuotationType, ResponseStatus, Role, StockRequestStatus};
pub use ids::{
    ActorId, EventId, ItemId, LineItemId, QuotationId, ResponseId, ResponseItemId, RetailerId,
    StockRequestItemId, StoreId,
};
pub use price::{Amount, Price};
pub use quantity::Quantity;
pub use quotation_status::QuotationStatus;
pub use timestamp::Timestamp;
