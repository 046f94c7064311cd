//! Combo selector.
//!
//! A combo coupon qualifies when every required pattern matches at least
//! one line item in the cart. Among qualifying coupons the largest fixed
//! amount wins.
//!
//! ```text
//! required: ["SUA*", "BMI*"]
//!
//! cart: SUA1, BMI2, CAFE  → SUA* ✓  BMI* ✓  → qualifies
//! cart: SUA1, SUA2        → SUA* ✓  BMI* ✗  → skipped
//! ```

use crate::cart::AppliedDiscount;
use crate::codes::parse_pattern_list;
use crate::error::{RuleError, RuleResult};
use crate::money::Money;
use crate::pattern::compile_all;
use crate::types::{Coupon, CouponCategory, CouponRule};

use super::select::WinnerSelector;
use super::PricingContext;

/// Picks the best combo coupon, if any qualifies.
pub fn select(coupons: &[&Coupon], ctx: &PricingContext<'_>) -> Option<AppliedDiscount> {
    let mut winner = WinnerSelector::new(CouponCategory::Combo);
    for coupon in coupons {
        if let CouponRule::Combo {
            required_product_codes,
        } = &coupon.rule
        {
            winner.offer(coupon, evaluate(coupon, required_product_codes.as_deref(), ctx));
        }
    }
    winner.into_discount()
}

fn evaluate(
    coupon: &Coupon,
    required_product_codes: Option<&str>,
    ctx: &PricingContext<'_>,
) -> RuleResult<Option<Money>> {
    let amount = coupon
        .fixed_amount
        .ok_or(RuleError::missing("fixedAmount"))?;

    let required = parse_pattern_list(required_product_codes);
    if required.is_empty() {
        return Ok(None);
    }

    let patterns = compile_all(&required)?;
    let satisfied = patterns.iter().all(|pattern| {
        ctx.line_items
            .iter()
            .any(|item| pattern.is_match(&item.product_code))
    });

    Ok(satisfied.then(|| amount.clamp_at_zero()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, CartLineItem};
    use chrono::NaiveDate;

    fn cart(codes: &[&str]) -> Cart {
        Cart::new(
            codes
                .iter()
                .map(|code| CartLineItem::new(*code, Money::from_units(10)))
                .collect(),
        )
    }

    fn combo(id: &str, codes: &str, amount: i64) -> Coupon {
        Coupon::new(id, id, CouponRule::Combo {
            required_product_codes: Some(codes.to_string()),
        })
        .with_fixed_amount(Money::from_units(amount))
    }

    fn run(cart: &Cart, coupons: &[Coupon]) -> Option<AppliedDiscount> {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ctx = PricingContext::new(cart, today);
        let refs: Vec<&Coupon> = coupons.iter().collect();
        select(&refs, &ctx)
    }

    #[test]
    fn test_all_patterns_must_match() {
        let coupons = vec![combo("milk", r#"["SUA*","BMI*"]"#, 5)];

        let hit = run(&cart(&["SUA1", "BMI2", "CAFE"]), &coupons).unwrap();
        assert_eq!(hit.coupon_id, "milk");
        assert_eq!(hit.amount, Money::from_units(5));
        assert_eq!(hit.category, CouponCategory::Combo);

        assert!(run(&cart(&["SUA1", "SUA2"]), &coupons).is_none());
    }

    #[test]
    fn test_csv_codes() {
        let coupons = vec![combo("milk", "SUA*, BMI*", 5)];
        assert!(run(&cart(&["SUA1", "BMI2"]), &coupons).is_some());
    }

    #[test]
    fn test_largest_amount_wins() {
        let coupons = vec![
            combo("small", "SUA*", 3),
            combo("big", "SUA*", 9),
            combo("unreachable", "XYZ*", 50),
        ];
        assert_eq!(run(&cart(&["SUA1"]), &coupons).unwrap().coupon_id, "big");
    }

    #[test]
    fn test_empty_requirements_never_qualify() {
        let coupons = vec![combo("empty", "[]", 5), combo("blank", "  ", 5)];
        assert!(run(&cart(&["SUA1"]), &coupons).is_none());
    }

    #[test]
    fn test_malformed_coupons_are_skipped() {
        let no_amount = Coupon::new("no-amount", "x", CouponRule::Combo {
            required_product_codes: Some("SUA*".to_string()),
        });
        let bad_pattern = combo("bad", "SUA(", 100);
        let good = combo("good", "SUA*", 1);

        let hit = run(&cart(&["SUA1"]), &[no_amount, bad_pattern, good]).unwrap();
        assert_eq!(hit.coupon_id, "good");
    }

    #[test]
    fn test_negative_amount_clamps_to_zero() {
        let coupons = vec![combo("neg", "SUA*", -4)];
        assert_eq!(run(&cart(&["SUA1"]), &coupons).unwrap().amount, Money::zero());
    }
}
