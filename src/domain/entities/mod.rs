//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Quotation`]: Quotation aggregate with state machine, owning line items,
//!   retailer responses and awards
//! - [`StockRequestItem`]: A store's replenishment request
//!
//! ## Entities
//!
//! - [`QuotationLineItem`]: One requested item within a quotation
//! - [`RetailerResponse`] / [`ResponseItem`]: A retailer's priced bid
//! - [`Award`]: Winning response item for a line item

pub mod award;
pub mod line_item;
pub mod quotation;
pub mod retailer_response;
pub mod stock_request;

pub use award::{Award, AwardChange, AwardSelection};
pub use line_item::{LineItemDraft, QuotationLineItem};
pub use quotation::{AwardOutcome, Quotation, QuotationBuilder};
pub use retailer_response::{ResponseItem, ResponseItemDraft, RetailerResponse};
pub use stock_request::StockRequestItem;
