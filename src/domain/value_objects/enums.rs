//! # Domain Enums
//!
//! Enumeration types for procurement concepts:
//!
//! - [`QuotationType`] - Regular, urgent or bulk quotation
//! - [`StockRequestStatus`] - Lifecycle of a store's stock request item
//! - [`ResponseStatus`] - Draft or submitted retailer response
//! - [`Role`] - Marketplace role of an authenticated caller
//!
//! All enums implement `Display`, `FromStr` and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of quotation raised by the admin.
///
/// # Examples
///
/// ```
/// use procurement_rfq::domain::value_objects::enums::QuotationType;
///
/// let kind: QuotationType = "urgent".parse().unwrap();
/// assert_eq!(kind, QuotationType::Urgent);
/// assert_eq!(kind.to_string(), "URGENT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationType {
    /// Standard replenishment quotation.
    #[default]
    Regular,
    /// Time-critical quotation.
    Urgent,
    /// Large-volume quotation.
    Bulk,
}

impl fmt::Display for QuotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "REGULAR"),
            Self::Urgent => write!(f, "URGENT"),
            Self::Bulk => write!(f, "BULK"),
        }
    }
}

impl FromStr for QuotationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REGULAR" => Ok(Self::Regular),
            "URGENT" => Ok(Self::Urgent),
            "BULK" => Ok(Self::Bulk),
            _ => Err(ParseEnumError::InvalidValue("QuotationType", s.to_string())),
        }
    }
}

/// Status of a store stock request item.
///
/// ```text
/// Pending → Quoted → Fulfilled
///             ↓
///          Pending (quotation cancelled)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockRequestStatus {
    /// Awaiting aggregation into a quotation.
    #[default]
    Pending,
    /// Included in a published quotation.
    Quoted,
    /// The quotation line covering this request was awarded.
    Fulfilled,
}

impl StockRequestStatus {
    /// Returns true if the status may move to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Quoted)
                | (Self::Quoted, Self::Fulfilled)
                | (Self::Quoted, Self::Pending)
        )
    }
}

impl fmt::Display for StockRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Quoted => write!(f, "QUOTED"),
            Self::Fulfilled => write!(f, "FULFILLED"),
        }
    }
}

impl FromStr for StockRequestStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "QUOTED" => Ok(Self::Quoted),
            "FULFILLED" => Ok(Self::Fulfilled),
            _ => Err(ParseEnumError::InvalidValue(
                "StockRequestStatus",
                s.to_string(),
            )),
        }
    }
}

/// Status of a retailer response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// Saved by the retailer, not yet visible to the admin.
    #[default]
    Draft,
    /// Submitted and eligible for award.
    Submitted,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Submitted => write!(f, "SUBMITTED"),
        }
    }
}

impl FromStr for ResponseStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            _ => Err(ParseEnumError::InvalidValue("ResponseStatus", s.to_string())),
        }
    }
}

/// Marketplace role of a caller, as asserted by the external identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Central procurement admin.
    Admin,
    /// Store raising stock requests.
    Store,
    /// Retailer answering quotations.
    Retailer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Store => write!(f, "STORE"),
            Self::Retailer => write!(f, "RETAILER"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "STORE" => Ok(Self::Store),
            "RETAILER" => Ok(Self::Retailer),
            _ => Err(ParseEnumError::InvalidValue("Role", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod quotation_type {
        use super::*;

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!("Bulk".parse::<QuotationType>().unwrap(), QuotationType::Bulk);
            assert!("weekly".parse::<QuotationType>().is_err());
        }

        #[test]
        fn default_is_regular() {
            assert_eq!(QuotationType::default(), QuotationType::Regular);
        }
    }

    mod stock_request_status {
        use super::*;

        #[test]
        fn transitions() {
            use StockRequestStatus::*;
            assert!(Pending.can_transition_to(Quoted));
            assert!(Quoted.can_transition_to(Fulfilled));
            assert!(Quoted.can_transition_to(Pending));
            assert!(!Pending.can_transition_to(Fulfilled));
            assert!(!Fulfilled.can_transition_to(Pending));
        }

        #[test]
        fn serde_format() {
            let json = serde_json::to_string(&StockRequestStatus::Quoted).unwrap();
            assert_eq!(json, "\"QUOTED\"");
        }
    }

    mod role {
        use super::*;

        #[test]
        fn roundtrip_display_parse() {
            for role in [Role::Admin, Role::Store, Role::Retailer] {
                assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
            }
        }

        #[test]
        fn parse_error_message() {
            let err = "auditor".parse::<Role>().unwrap_err();
            assert_eq!(err.to_string(), "invalid Role value: 'auditor'");
        }
    }

    #[test]
    fn response_status_parse() {
        assert_eq!(
            "submitted".parse::<ResponseStatus>().unwrap(),
            ResponseStatus::Submitted
        );
    }
}
