//! # Price and Amount
//!
//! Monetary value objects.
//!
//! - [`Price`]: a strictly positive unit price quoted by a retailer
//! - [`Amount`]: a non-negative monetary total derived from prices
//!
//! Totals are always derived (`unit_price × quantity`) and never accepted
//! from callers.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::value_objects::{Price, Quantity};
//! use rust_decimal::Decimal;
//!
//! let price = Price::new(Decimal::new(4550, 2)).unwrap();
//! let qty = Quantity::new(Decimal::new(10, 0)).unwrap();
//!
//! assert_eq!(price.total_for(qty).unwrap().get(), Decimal::new(455, 0));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{ArithmeticResult, CheckedArithmetic};
use crate::domain::value_objects::quantity::Quantity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strictly positive unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a price, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if `value <= 0`.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!(
                "unit price must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns `self × quantity` as an [`Amount`].
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the multiplication overflows.
    pub fn total_for(&self, quantity: Quantity) -> ArithmeticResult<Amount> {
        self.0.safe_mul(quantity.get()).map(Amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative monetary total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the sum overflows.
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
