//! Aggregation of applied discounts into the final result.

use crate::cart::{AppliedDiscount, PricingResult};
use crate::money::Money;

/// Sums the applied discounts and computes the final total.
///
/// The final total never goes below zero, however large the discounts.
/// Sums saturate at the decimal range rather than overflowing.
///
/// ```rust
/// use coupon_core::engine::aggregate::summarize;
/// use coupon_core::Money;
///
/// let result = summarize(Money::from_units(20), Vec::new());
/// assert_eq!(result.final_total, Money::from_units(20));
/// ```
pub fn summarize(original_total: Money, applied_discounts: Vec<AppliedDiscount>) -> PricingResult {
    let total_discount: Money = applied_discounts.iter().map(|discount| discount.amount).sum();
    let final_total = original_total.saturating_sub(total_discount).clamp_at_zero();

    PricingResult {
        applied_discounts,
        total_discount,
        original_total,
        final_total,
    }
}
