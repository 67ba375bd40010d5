//! # Infrastructure Layer
//!
//! Adapters for the ports defined by the domain and application layers.
//!
//! - [`persistence`]: Quotation and stock request repositories
//! - [`events`]: Domain event publishers

pub mod events;
pub mod persistence;
