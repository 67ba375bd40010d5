//! # In-Memory Repositories
//!
//! In-memory implementations for testing and single-node deployments without
//! database dependencies.
//!
//! ## Available Repositories
//!
//! - [`InMemoryQuotationRepository`]: Quotation aggregate persistence
//! - [`InMemoryStockRequestRepository`]: Stock request persistence
//!
//! ## Thread Safety
//!
//! Both repositories share one `Arc<RwLock<_>>` so that a quotation commit and
//! the stock request flips it carries are applied under a single write lock.
//! Use [`InMemoryQuotationRepository::stock_requests`] to obtain the paired
//! stock request repository.

pub mod quotation_repository;
pub mod stock_request_repository;

pub use quotation_repository::InMemoryQuotationRepository;
pub use stock_request_repository::InMemoryStockRequestRepository;

use crate::domain::entities::{Quotation, StockRequestItem};
use crate::domain::value_objects::{QuotationId, StockRequestItemId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Tables shared by the in-memory repositories.
#[derive(Debug, Default)]
pub(crate) struct Storage {
    pub(crate) quotations: HashMap<QuotationId, Quotation>,
    pub(crate) stock_requests: HashMap<StockRequestItemId, StockRequestItem>,
    pub(crate) quotation_sequence: u64,
}

pub(crate) type SharedStorage = Arc<RwLock<Storage>>;
