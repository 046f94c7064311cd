//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Why not integer cents?                                                 │
//! │    A caller may declare a cart total of 99.995. Truncating it to        │
//! │    cents before the percentage is applied changes the rounded result.  │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 decimals (rust_decimal)                    │
//! │    99.995 × 10% = 9.9995 → rounds half-up to 10.00                      │
//! │    Rounding happens once, at the discount, never on the inputs          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coupon_core::money::Money;
//!
//! // Create from cents
//! let price = Money::from_cents(1099); // 10.99
//!
//! // Arithmetic operations
//! let doubled = price.checked_times(2);        // Some(21.98)
//! let total = price + Money::from_cents(500);  // 15.99
//! assert_eq!(doubled, Some(Money::from_cents(2198)));
//! assert_eq!(total, Money::from_cents(1599));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::types::Percentage;

/// Number of decimal places every computed discount is rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the store currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact base-10 arithmetic, negatives are allowed so
///   that malformed rule data can be detected and clamped
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **No currency**: the engine never converts between currencies
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CartLineItem.unit_price ──► reference total ──► percentage discounts  │
/// │                                     │                                   │
/// │  Coupon.fixed_amount ───────────────┼──► AppliedDiscount.amount         │
/// │                                     ▼                                   │
/// │            PricingResult { total_discount, original_total, final_total }│
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest display unit).
    ///
    /// ## Example
    /// ```rust
    /// use coupon_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_DECIMAL_PLACES))
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// Discounts and final totals are never allowed to go below zero.
    ///
    /// ```rust
    /// use coupon_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-550).clamp_at_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(550).clamp_at_zero(), Money::from_cents(550));
    /// ```
    #[inline]
    pub fn clamp_at_zero(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Rounds to two decimal places, half away from zero (half-up for
    /// the non-negative amounts the engine produces).
    pub fn round_to_cents(self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Calculates `percentage %` of this amount, rounded to cents half-up.
    ///
    /// Returns `None` if the multiplication overflows the decimal range,
    /// which only happens with absurd rule data.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_core::money::Money;
    /// use coupon_core::types::Percentage;
    /// use std::str::FromStr;
    ///
    /// let total: Money = "99.995".parse().unwrap();
    /// let pct = Percentage::from_str("10").unwrap();
    ///
    /// // 99.995 × 10% = 9.9995 → 10.00
    /// assert_eq!(total.percentage(pct), Some(Money::from_cents(1000)));
    /// ```
    pub fn percentage(&self, percentage: Percentage) -> Option<Money> {
        let raw = self.0.checked_mul(percentage.value())? / Decimal::ONE_HUNDRED;
        Some(Money(raw).round_to_cents())
    }

    /// Adds, pinning the result to the largest or smallest representable
    /// amount instead of overflowing.
    ///
    /// ```rust
    /// use coupon_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let max = Money::new(Decimal::MAX);
    /// assert_eq!(max.saturating_add(Money::from_units(1)), max);
    /// ```
    #[inline]
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts, pinning the result to the decimal range.
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Multiplies by an item count, returning `None` on overflow.
    ///
    /// ```rust
    /// use coupon_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(5).checked_times(2), Some(Money::from_units(10)));
    /// ```
    pub fn checked_times(&self, count: usize) -> Option<Money> {
        let count = Decimal::from(u64::try_from(count).ok()?);
        self.0.checked_mul(count).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the plain decimal amount ("10.99", "99.995").
///
/// Currency symbols and localisation are left to the front-end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Addition of two Money values, saturating at the decimal range.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

/// Subtraction of two Money values, saturating at the decimal range.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        self.saturating_sub(other)
    }
}

/// Sums saturate instead of overflowing, so a huge discount total still
/// clamps the final total to zero.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
        assert_eq!(Money::from_units(10), Money::new(dec!(10.00)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::new(dec!(99.995)).to_string(), "99.995");
    }

    #[test]
    fn test_parse() {
        assert_eq!("12.5".parse::<Money>().unwrap(), Money::new(dec!(12.5)));
        assert_eq!(" 7 ".parse::<Money>().unwrap(), Money::from_units(7));
        assert!("seven".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(b - a, Money::from_cents(-500));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::new(Decimal::MAX);
        let min = Money::new(Decimal::MIN);

        assert_eq!(max + max, max);
        assert_eq!(min - max, min);
        assert_eq!(max.saturating_add(Money::from_units(1)), max);
        assert_eq!(min.saturating_sub(Money::from_units(1)), min);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(100), Money::from_cents(250), Money::zero()];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_cents(350));

        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_sum_saturates_instead_of_panicking() {
        let max = Money::new(Decimal::MAX);
        let total: Money = [max, max, Money::from_units(1)].iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let total = Money::new(dec!(99.995));
        let ten = Percentage::new(dec!(10));
        assert_eq!(total.percentage(ten), Some(Money::new(dec!(10.00))));

        // 0.125 → 0.13 (half-up, not bankers)
        let small = Money::new(dec!(1.25));
        assert_eq!(small.percentage(ten), Some(Money::new(dec!(0.13))));
    }

    #[test]
    fn test_percentage_overflow_is_none() {
        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.percentage(Percentage::new(dec!(1000))), None);
    }

    #[test]
    fn test_checked_times() {
        let five = Money::from_units(5);
        assert_eq!(five.checked_times(0), Some(Money::zero()));
        assert_eq!(five.checked_times(3), Some(Money::from_units(15)));
        assert_eq!(Money::new(Decimal::MAX).checked_times(2), None);
    }

    #[test]
    fn test_clamp_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.clamp_at_zero(), Money::zero());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());
        assert_eq!(positive.clamp_at_zero(), positive);
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(1050)).unwrap();
        assert_eq!(json, "\"10.50\"");

        let parsed: Money = serde_json::from_str("\"10.50\"").unwrap();
        assert_eq!(parsed, Money::from_cents(1050));

        let from_number: Money = serde_json::from_str("12").unwrap();
        assert_eq!(from_number, Money::from_units(12));
    }
}
