//! # Persistence Layer
//!
//! Repository ports and their implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`QuotationRepository`]: Persistence for the quotation aggregate
//! - [`StockRequestRepository`]: Persistence for store stock requests
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory implementations sharing one atomic store

pub mod in_memory;
pub mod traits;

pub use in_memory::{InMemoryQuotationRepository, InMemoryStockRequestRepository};
pub use traits::{QuotationRepository, RepositoryError, RepositoryResult, StockRequestRepository};
