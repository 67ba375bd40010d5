//! # Checked Arithmetic
//!
//! Overflow-checked decimal arithmetic for quantities and amounts.
//!
//! Quantities are summed when stock requests are aggregated and prices are
//! multiplied by quantities to derive response totals. Both paths go through
//! [`CheckedArithmetic`] so an overflow surfaces as an error instead of a panic.
//!
//! # Examples
//!
//! ```
//! use procurement_rfq::domain::value_objects::arithmetic::{checked_sum, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let total = Decimal::new(12, 0).safe_mul(Decimal::new(5, 1)).unwrap();
//! assert_eq!(total, Decimal::new(6, 0));
//!
//! let sum = checked_sum([Decimal::ONE, Decimal::TWO]).unwrap();
//! assert_eq!(sum, Decimal::new(3, 0));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Checked arithmetic that never panics.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Sums decimals with overflow checking.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if any partial sum overflows.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> ArithmeticResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.safe_add(value))
}
