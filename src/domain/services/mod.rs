//! # Domain Services
//!
//! Domain logic that doesn't naturally belong to a single entity.
//!
//! ## Services
//!
//! - [`response_window`]: Derived "is the quotation still accepting responses"
//!   view consulted by every gate on the deadline

pub mod response_window;

pub use response_window::{ResponseWindow, is_expired};
