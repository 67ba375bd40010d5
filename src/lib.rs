//! # Procurement RFQ
//!
//! Quotation lifecycle and award allocation engine for a store/retailer
//! procurement marketplace.
//!
//! Stores raise stock requests. An admin aggregates pending requests into a
//! quotation and publishes it to retailers, who answer with priced responses
//! until the deadline. Once the response window is over the admin compares
//! candidates per line item and awards winners, partially or in full.
//!
//! # Architecture
//!
//! - [`domain`]: value objects, the quotation aggregate, events and errors
//! - [`application`]: engine services and the capability-checked
//!   [`Procurement`](application::Procurement) facade
//! - [`infrastructure`]: repositories and event publishers
//! - [`api`]: axum REST API
//! - [`config`] / [`telemetry`]: runtime settings and log output
//!
//! # Quotation Lifecycle
//!
//! ```text
//! Draft ──publish──► Published ──close / first award──► Closed ──full award──► Awarded
//!   │                    │                                  │
//!   └────────────────────┴──────────────cancel──────────────┴──► Cancelled
//! ```
//!
//! "Expired" is never stored: a published quotation past its deadline is
//! treated as expired at the moment of each call.
//!
//! # Example
//!
//! ```
//! use procurement_rfq::application::{Caller, EngineConfig, Procurement};
//! use procurement_rfq::application::services::NewStockRequest;
//! use procurement_rfq::infrastructure::events::InMemoryEventPublisher;
//! use rust_decimal::dec;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Procurement::with_system_clock(
//!     Arc::new(InMemoryEventPublisher::new()),
//!     EngineConfig::default(),
//! );
//!
//! let store = Caller::store("store-7");
//! let request = engine
//!     .raise_stock_request(&store, NewStockRequest::new("rice-5kg", dec!(12), "bag"))
//!     .await?;
//! assert!(request.is_pending());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
