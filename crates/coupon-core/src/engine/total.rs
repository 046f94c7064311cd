//! Total selector.
//!
//! A total coupon qualifies when the reference total reaches its minimum
//! order amount (no minimum means always). Its value is computed from
//! either the fixed amount or the percentage.
//!
//! ## Discount Value
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fixed > 0                 → fixed                                      │
//! │  else percentage present   → reference × pct / 100, rounded half-up     │
//! │  else fixed present        → fixed (zero or negative, clamped to 0)    │
//! │  else                      → malformed, coupon skipped                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The same rule prices customer coupons.

use crate::cart::AppliedDiscount;
use crate::error::{RuleError, RuleResult};
use crate::money::Money;
use crate::types::{Coupon, CouponCategory, CouponRule};

use super::select::WinnerSelector;
use super::PricingContext;

/// Picks the most valuable total coupon, if any qualifies.
pub fn select(coupons: &[&Coupon], ctx: &PricingContext<'_>) -> Option<AppliedDiscount> {
    let mut winner = WinnerSelector::new(CouponCategory::Total);
    for coupon in coupons {
        if let CouponRule::Total { min_order_amount } = &coupon.rule {
            winner.offer(coupon, evaluate(coupon, *min_order_amount, ctx));
        }
    }
    winner.into_discount()
}

fn evaluate(
    coupon: &Coupon,
    min_order_amount: Option<Money>,
    ctx: &PricingContext<'_>,
) -> RuleResult<Option<Money>> {
    if !meets_minimum(min_order_amount, ctx.reference_total) {
        return Ok(None);
    }
    discount_value(coupon, ctx.reference_total).map(Some)
}

/// True when there is no minimum or the reference total reaches it.
pub(crate) fn meets_minimum(min_order_amount: Option<Money>, reference_total: Money) -> bool {
    min_order_amount.map_or(true, |min| reference_total >= min)
}

/// The amount a threshold coupon (total or customer) discounts.
pub(crate) fn discount_value(coupon: &Coupon, reference_total: Money) -> RuleResult<Money> {
    match (coupon.fixed_amount, coupon.percentage) {
        (Some(fixed), _) if fixed.is_positive() => Ok(fixed),
        (_, Some(percentage)) => reference_total
            .percentage(percentage)
            .map(Money::clamp_at_zero)
            .ok_or(RuleError::ArithmeticOverflow),
        (Some(fixed), None) => Ok(fixed.clamp_at_zero()),
        (None, None) => Err(RuleError::missing("fixedAmount")),
    }
}
