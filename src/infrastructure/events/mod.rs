//! # Event Publishing
//!
//! Adapters that deliver [`ProcurementEvent`]s after a quotation commit.
//!
//! Publishing happens after persistence succeeds. A failed publish never
//! rolls back a committed transition; callers log it and move on.
//!
//! - [`InMemoryEventPublisher`]: Records events for inspection in tests
//! - [`BroadcastEventPublisher`]: Fans events out over a tokio broadcast channel
//!
//! [`ProcurementEvent`]: crate::domain::events::ProcurementEvent

pub mod broadcast;
pub mod in_memory;
pub mod publisher;

pub use broadcast::{BroadcastEventPublisher, DEFAULT_CHANNEL_CAPACITY};
pub use in_memory::InMemoryEventPublisher;
pub use publisher::{EventPublisher, PublishError, PublishResult};
