//! # Identifiers
//!
//! Strongly-typed identifiers for procurement entities.
//!
//! Aggregate-owned entities (quotations, line items, responses) use
//! UUID-backed identifiers generated by the engine. Actors and catalogue
//! items are identified by opaque strings issued by external systems.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::value_objects::{QuotationId, RetailerId};
//!
//! let quotation = QuotationId::new_v4();
//! let retailer = RetailerId::new("retailer-42");
//!
//! assert_ne!(quotation, QuotationId::new_v4());
//! assert_eq!(retailer.as_str(), "retailer-42");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[inline]
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

uuid_id!(
    /// Identifier of a [`Quotation`](crate::domain::entities::Quotation).
    QuotationId
);
uuid_id!(
    /// Identifier of a quotation line item.
    LineItemId
);
uuid_id!(
    /// Identifier of a retailer response.
    ResponseId
);
uuid_id!(
    /// Identifier of a single priced line in a retailer response.
    ResponseItemId
);
uuid_id!(
    /// Identifier of a store stock request item.
    StockRequestItemId
);
uuid_id!(
    /// Identifier of a domain event.
    EventId
);

string_id!(
    /// Identifier of a store (buyer).
    StoreId
);
string_id!(
    /// Identifier of a retailer (supplier).
    RetailerId
);
string_id!(
    /// Identifier of a catalogue item.
    ItemId
);
string_id!(
    /// Identifier of an authenticated actor (admin user, store, retailer).
    ActorId
);

impl From<&RetailerId> for ActorId {
    fn from(id: &RetailerId) -> Self {
        Self::new(id.as_str())
    }
}

impl From<&StoreId> for ActorId {
    fn from(id: &StoreId) -> Self {
        Self::new(id.as_str())
    }
}
