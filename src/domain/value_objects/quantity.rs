//! # Quantity
//!
//! Non-negative decimal quantity of goods.
//!
//! Quantities are summed when stock requests are aggregated into a single
//! line item, so they use [`Decimal`] rather than floating point.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{ArithmeticResult, CheckedArithmetic};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-negative quantity.
///
/// # Examples
///
/// ```
/// use procurement_rfq::domain::value_objects::Quantity;
/// use rust_decimal::Decimal;
///
/// let a = Quantity::new(Decimal::new(4, 0)).unwrap();
/// let b = Quantity::new(Decimal::new(6, 0)).unwrap();
/// assert_eq!(a.safe_add(b).unwrap().get(), Decimal::new(10, 0));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Creates a quantity, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `value < 0`.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::InvalidQuantity(format!(
                "quantity must not be negative, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Creates a strictly positive quantity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `value <= 0`.
    pub fn positive(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity(format!(
                "quantity must be positive, got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Returns a zero quantity.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the quantity is greater than zero.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the quantity is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds two quantities.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the sum overflows.
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn new_accepts_zero() {
        assert!(Quantity::new(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn new_rejects_negative() {
        assert!(matches!(
            Quantity::new(dec!(-1)),
            Err(DomainError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(matches!(
            Quantity::positive(Decimal::ZERO),
            Err(DomainError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn sum_is_decimal_exact() {
        let a = Quantity::new(dec!(0.1)).unwrap();
        let b = Quantity::new(dec!(0.2)).unwrap();
        assert_eq!(a.safe_add(b).unwrap().get(), dec!(0.3));
    }

    #[test]
    fn ordering() {
        let small = Quantity::new(dec!(5)).unwrap();
        let large = Quantity::new(dec!(10)).unwrap();
        assert!(small < large);
        assert!(small.is_positive());
    }
}
