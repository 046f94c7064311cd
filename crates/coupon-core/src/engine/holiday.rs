//! Holiday selector.
//!
//! A holiday coupon qualifies when the business date falls inside its
//! holiday window, both ends inclusive. The holiday code is display data
//! only. Largest fixed amount wins.

use crate::cart::AppliedDiscount;
use crate::error::{RuleError, RuleResult};
use crate::money::Money;
use crate::types::{Coupon, CouponCategory, CouponRule, DateWindow};

use super::select::WinnerSelector;
use super::PricingContext;

/// Picks the best holiday coupon open on the business date.
pub fn select(coupons: &[&Coupon], ctx: &PricingContext<'_>) -> Option<AppliedDiscount> {
    let mut winner = WinnerSelector::new(CouponCategory::Holiday);
    for coupon in coupons {
        if let CouponRule::Holiday { window, .. } = &coupon.rule {
            winner.offer(coupon, evaluate(coupon, window, ctx));
        }
    }
    winner.into_discount()
}

fn evaluate(
    coupon: &Coupon,
    window: &DateWindow,
    ctx: &PricingContext<'_>,
) -> RuleResult<Option<Money>> {
    let amount = coupon
        .fixed_amount
        .ok_or(RuleError::missing("fixedAmount"))?;

    Ok(window
        .contains(ctx.business_date)
        .then(|| amount.clamp_at_zero()))
}
