//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! Every mutating service serializes work per quotation through
//! [`QuotationLocks`], commits through the repository with an expected
//! version, and publishes events only after the commit succeeded.
//!
//! - [`StockRequestService`]: Store replenishment requests
//! - [`StockRequestAggregator`]: Groups pending requests into line items
//! - [`QuotationLifecycleService`]: Create, publish, close, cancel
//! - [`RetailerResponseLedger`]: Draft and submitted retailer responses
//! - [`AwardComparisonEngine`]: Ranked candidates per line item
//! - [`AwardAllocator`]: Commits award selections
//! - [`RankingStrategy`]: Strategies for ordering candidates

pub mod award_allocation;
pub mod award_comparison;
mod commit;
pub mod quotation_lifecycle;
pub mod quotation_locks;
pub mod ranking_strategy;
pub mod response_ledger;
pub mod stock_request_aggregation;
pub mod stock_requests;

pub use award_allocation::{AwardAllocator, AwardCommit};
pub use award_comparison::{
    AlreadyAwarded, AwardComparison, AwardComparisonEngine, LineItemComparison, build_comparison,
};
pub use quotation_lifecycle::{NewAggregatedQuotation, NewQuotation, QuotationLifecycleService};
pub use quotation_locks::QuotationLocks;
pub use ranking_strategy::{Candidate, LowestPriceStrategy, RankingStrategy};
pub use response_ledger::{ResponseSubmission, RetailerResponseLedger};
pub use stock_request_aggregation::{
    AggregatedLineItem, ContributingRequest, StockRequestAggregator, aggregate,
};
pub use stock_requests::{NewStockRequest, StockRequestService};
