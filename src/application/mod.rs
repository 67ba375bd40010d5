//! # Application Layer
//!
//! Use cases that orchestrate the domain over the repository and event ports.
//!
//! - [`procurement`]: capability-checked facade, the entry point for callers
//! - [`services`]: one service per engine component
//! - [`authorization`]: caller roles and capabilities
//! - [`clock`]: source of "now"
//! - [`engine_config`]: engine tunables
//! - [`error`]: application errors

pub mod authorization;
pub mod clock;
pub mod engine_config;
pub mod error;
pub mod procurement;
pub mod services;

pub use authorization::{Action, Caller, authorize};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine_config::EngineConfig;
pub use error::{ApplicationError, ApplicationResult};
pub use procurement::{Procurement, RetailerLineItem, RetailerQuotationView};
