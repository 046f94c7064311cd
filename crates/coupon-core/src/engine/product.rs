//! Product stacker.
//!
//! Product coupons do not compete. Every eligible one applies, and it
//! applies once per matching line item.
//!
//! ## Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A line item matches when its code is in applicableProductCodes         │
//! │  (exact, JSON array) OR matches productPattern (wildcard).              │
//! │                                                                         │
//! │  cart: SUA1, SUA1, BMI2      coupon: pattern SUA*, fixed 2.00           │
//! │                                                                         │
//! │  matched: [SUA1, SUA1]       amount: 2.00 × 2 = 4.00                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use crate::cart::AppliedDiscount;
use crate::codes::parse_code_list;
use crate::error::{RuleError, RuleResult};
use crate::pattern::WildcardPattern;
use crate::types::{Coupon, CouponCategory, CouponRule};

use super::PricingContext;

/// Applies every eligible product coupon, in catalog order.
pub fn stack(coupons: &[&Coupon], ctx: &PricingContext<'_>) -> Vec<AppliedDiscount> {
    let mut applied = Vec::new();

    for coupon in coupons {
        let CouponRule::Product {
            applicable_product_codes,
            product_pattern,
        } = &coupon.rule
        else {
            continue;
        };

        match apply(
            coupon,
            applicable_product_codes.as_deref(),
            product_pattern.as_deref(),
            ctx,
        ) {
            Ok(Some(discount)) => {
                debug!(
                    coupon_id = %coupon.id,
                    amount = %discount.amount,
                    matched = discount.matched_product_codes.as_ref().map_or(0, Vec::len),
                    "product coupon applied"
                );
                applied.push(discount);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    coupon_id = %coupon.id,
                    category = %CouponCategory::Product,
                    error = %err,
                    "skipping malformed coupon"
                );
            }
        }
    }

    applied
}

fn apply(
    coupon: &Coupon,
    applicable_product_codes: Option<&str>,
    product_pattern: Option<&str>,
    ctx: &PricingContext<'_>,
) -> RuleResult<Option<AppliedDiscount>> {
    let unit_amount = coupon
        .fixed_amount
        .ok_or(RuleError::missing("fixedAmount"))?
        .clamp_at_zero();

    let codes = parse_code_list(applicable_product_codes);
    let pattern = product_pattern
        .filter(|pattern| !pattern.trim().is_empty())
        .map(WildcardPattern::compile)
        .transpose()?;

    let matched: Vec<String> = ctx
        .line_items
        .iter()
        .filter(|item| {
            codes.contains(&item.product_code)
                || pattern
                    .as_ref()
                    .is_some_and(|pattern| pattern.is_match(&item.product_code))
        })
        .map(|item| item.product_code.clone())
        .collect();

    if matched.is_empty() {
        return Ok(None);
    }

    let amount = unit_amount
        .checked_times(matched.len())
        .ok_or(RuleError::ArithmeticOverflow)?;

    Ok(Some(AppliedDiscount {
        coupon_id: coupon.id.clone(),
        category: CouponCategory::Product,
        name: coupon.name.clone(),
        amount,
        description: coupon.description.clone(),
        matched_product_codes: Some(matched),
    }))
}
