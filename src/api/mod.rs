//! # API Layer
//!
//! Transport adapters over the application facade.
//!
//! - [`rest`]: axum REST API

pub mod rest;
