//! # Quotation Status
//!
//! Stored lifecycle status of a quotation.
//!
//! # State Machine
//!
//! ```text
//! Draft → Published → Closed → Awarded
//!   ↓         ↓          ↓
//!   └─────────┴──────────┴→ Cancelled
//! ```
//!
//! "Expired" is not a stored status: a `Published` quotation whose deadline has
//! elapsed is derived as expired by
//! [`response_window`](crate::domain::services::response_window).
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::value_objects::QuotationStatus;
//!
//! assert!(QuotationStatus::Draft.can_transition_to(QuotationStatus::Published));
//! assert!(!QuotationStatus::Closed.can_transition_to(QuotationStatus::Published));
//! assert!(QuotationStatus::Awarded.is_terminal());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_objects::enums::ParseEnumError;

/// Stored quotation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum QuotationStatus {
    /// Being authored by the admin; invisible to retailers.
    #[default]
    Draft = 0,

    /// Broadcast to retailers; accepting responses until the deadline.
    Published = 1,

    /// Closed early by the admin; no further responses.
    Closed = 2,

    /// Every line item with a submitted candidate has an award (terminal).
    Awarded = 3,

    /// Withdrawn by the admin (terminal).
    Cancelled = 4,
}

impl QuotationStatus {
    /// Returns true if this is a terminal status.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Awarded | Self::Cancelled)
    }

    /// Returns true if this status can transition to `target`.
    ///
    /// Transitions never move backwards along
    /// `Draft < Published < Closed < Awarded`, and `Cancelled` is reachable
    /// from every non-terminal status.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published)
                | (Self::Draft, Self::Cancelled)
                | (Self::Published, Self::Closed)
                | (Self::Published, Self::Cancelled)
                | (Self::Closed, Self::Awarded)
                | (Self::Closed, Self::Cancelled)
        )
    }

    /// Returns the valid next statuses.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Draft => vec![Self::Published, Self::Cancelled],
            Self::Published => vec![Self::Closed, Self::Cancelled],
            Self::Closed => vec![Self::Awarded, Self::Cancelled],
            Self::Awarded | Self::Cancelled => vec![],
        }
    }

    /// Position along the forward progression, `None` for `Cancelled`.
    ///
    /// Observed statuses of a quotation are non-decreasing in this rank.
    #[must_use]
    pub const fn progression(&self) -> Option<u8> {
        match self {
            Self::Draft => Some(0),
            Self::Published => Some(1),
            Self::Closed => Some(2),
            Self::Awarded => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Returns the numeric value of this status.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Closed => "CLOSED",
            Self::Awarded => "AWARDED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for QuotationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            "CLOSED" => Ok(Self::Closed),
            "AWARDED" => Ok(Self::Awarded),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::InvalidValue(
                "QuotationStatus",
                s.to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [QuotationStatus; 5] = [
        QuotationStatus::Draft,
        QuotationStatus::Published,
        QuotationStatus::Closed,
        QuotationStatus::Awarded,
        QuotationStatus::Cancelled,
    ];

    mod transitions {
        use super::*;

        #[test]
        fn forward_path() {
            assert!(QuotationStatus::Draft.can_transition_to(QuotationStatus::Published));
            assert!(QuotationStatus::Published.can_transition_to(QuotationStatus::Closed));
            assert!(QuotationStatus::Closed.can_transition_to(QuotationStatus::Awarded));
        }

        #[test]
        fn cancel_from_non_terminal() {
            for status in [
                QuotationStatus::Draft,
                QuotationStatus::Published,
                QuotationStatus::Closed,
            ] {
                assert!(status.can_transition_to(QuotationStatus::Cancelled));
            }
        }

        #[test]
        fn terminal_statuses_have_no_transitions() {
            for status in [QuotationStatus::Awarded, QuotationStatus::Cancelled] {
                assert!(status.valid_transitions().is_empty());
                for target in ALL {
                    assert!(!status.can_transition_to(target));
                }
            }
        }

        #[test]
        fn every_allowed_transition_moves_forward() {
            for from in ALL {
                for to in ALL {
                    if !from.can_transition_to(to) {
                        continue;
                    }
                    assert!(from.progression().is_some(), "{from} must not be terminal");
                    if let (Some(a), Some(b)) = (from.progression(), to.progression()) {
                        assert!(b > a, "{from} -> {to}");
                    }
                }
            }
        }

        #[test]
        fn valid_transitions_agree_with_can_transition_to() {
            for from in ALL {
                for to in ALL {
                    assert_eq!(
                        from.valid_transitions().contains(&to),
                        from.can_transition_to(to)
                    );
                }
            }
        }

        #[test]
        fn no_self_transitions() {
            for status in ALL {
                assert!(!status.can_transition_to(status));
            }
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_and_parse_roundtrip() {
            for status in ALL {
                assert_eq!(status.to_string().parse::<QuotationStatus>().unwrap(), status);
            }
        }

        #[test]
        fn serde_format() {
            let json = serde_json::to_string(&QuotationStatus::Published).unwrap();
            assert_eq!(json, "\"PUBLISHED\"");
        }
    }

    #[test]
    fn default_is_draft() {
        assert_eq!(QuotationStatus::default(), QuotationStatus::Draft);
        assert_eq!(QuotationStatus::Draft.as_u8(), 0);
    }
}
