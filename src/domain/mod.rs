//! # Domain Layer
//!
//! Pure business rules of the quotation lifecycle. Nothing in this layer
//! performs I/O or reads the wall clock.
//!
//! - [`value_objects`]: identifiers, money, quantities, statuses
//! - [`entities`]: the quotation aggregate and stock requests
//! - [`services`]: response window evaluation
//! - [`events`]: notifications emitted after committed changes
//! - [`errors`]: business rule violations

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
