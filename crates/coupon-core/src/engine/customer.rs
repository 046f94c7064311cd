//! Customer (loyalty card) selector.
//!
//! Only runs when the cart carries a non-blank card identifier. A coupon
//! qualifies when one of its card patterns equals the card or matches it
//! as a wildcard, after both sides are trimmed and upper-cased, and the
//! reference total reaches the minimum order amount.
//!
//! ```text
//! card: " gcard-0042 "  → GCARD-0042
//!
//! patterns: ["VIP*", "gcard*"]
//!            VIP*   → no
//!            GCARD* → match
//! ```
//!
//! Values follow the total coupon rule (fixed amount, else percentage).

use crate::cart::{normalize_card, AppliedDiscount};
use crate::codes::parse_pattern_list;
use crate::error::RuleResult;
use crate::money::Money;
use crate::pattern::WildcardPattern;
use crate::types::{Coupon, CouponCategory, CouponRule};

use super::select::WinnerSelector;
use super::total::{discount_value, meets_minimum};
use super::PricingContext;

/// Picks the most valuable card coupon for the cart's card.
pub fn select(coupons: &[&Coupon], ctx: &PricingContext<'_>) -> Option<AppliedDiscount> {
    let card = ctx.card.as_deref()?;

    let mut winner = WinnerSelector::new(CouponCategory::Customer);
    for coupon in coupons {
        if let CouponRule::Customer {
            card_patterns,
            min_order_amount,
        } = &coupon.rule
        {
            let outcome = evaluate(coupon, card_patterns.as_deref(), *min_order_amount, card, ctx);
            winner.offer(coupon, outcome);
        }
    }
    winner.into_discount()
}

fn evaluate(
    coupon: &Coupon,
    card_patterns: Option<&str>,
    min_order_amount: Option<Money>,
    card: &str,
    ctx: &PricingContext<'_>,
) -> RuleResult<Option<Money>> {
    if !card_matches(card, card_patterns)? {
        return Ok(None);
    }
    if !meets_minimum(min_order_amount, ctx.reference_total) {
        return Ok(None);
    }
    discount_value(coupon, ctx.reference_total).map(Some)
}

/// Checks a normalized card against a raw pattern list.
///
/// Patterns are tried in order and the first match wins, so a broken
/// pattern after a matching one is never compiled.
fn card_matches(card: &str, card_patterns: Option<&str>) -> RuleResult<bool> {
    for raw in parse_pattern_list(card_patterns) {
        let pattern = normalize_card(&raw);
        if pattern == card || WildcardPattern::compile(&pattern)?.is_match(card) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, CartLineItem};
    use crate::error::RuleError;
    use crate::types::Percentage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn customer(id: &str, patterns: &str, min: Option<i64>) -> Coupon {
        Coupon::new(id, id, CouponRule::Customer {
            card_patterns: Some(patterns.to_string()),
            min_order_amount: min.map(Money::from_units),
        })
    }

    fn run(card: Option<&str>, coupons: &[Coupon]) -> Option<AppliedDiscount> {
        let mut cart = Cart::new(vec![CartLineItem::new("SUA1", Money::from_units(100))]);
        if let Some(card) = card {
            cart = cart.with_card(card);
        }
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ctx = PricingContext::new(&cart, today);
        let refs: Vec<&Coupon> = coupons.iter().collect();
        select(&refs, &ctx)
    }

    #[test]
    fn test_card_match_is_case_and_space_insensitive() {
        let coupons = vec![customer("g", r#"["gcard*"]"#, None).with_fixed_amount(Money::from_units(7))];

        let hit = run(Some("  Gcard-0042 "), &coupons).unwrap();
        assert_eq!(hit.coupon_id, "g");
        assert_eq!(hit.category, CouponCategory::Customer);
        assert!(run(Some("VIP-1"), &coupons).is_none());
    }

    #[test]
    fn test_exact_card_number() {
        let coupons = vec![customer("one", "CARD-1, CARD-2", None).with_fixed_amount(Money::from_units(3))];
        assert!(run(Some("card-2"), &coupons).is_some());
        assert!(run(Some("card-3"), &coupons).is_none());
    }

    #[test]
    fn test_no_card_skips_category() {
        let coupons = vec![customer("any", "*", None).with_fixed_amount(Money::from_units(3))];
        assert!(run(None, &coupons).is_none());
        assert!(run(Some("   "), &coupons).is_none());
    }

    #[test]
    fn test_minimum_and_percentage() {
        let coupons = vec![
            customer("pct", "G*", Some(50)).with_percentage(Percentage::new(dec!(15))),
            customer("rich-only", "G*", Some(500)).with_fixed_amount(Money::from_units(90)),
        ];
        let hit = run(Some("G1"), &coupons).unwrap();
        assert_eq!(hit.coupon_id, "pct");
        assert_eq!(hit.amount, Money::from_units(15));
    }

    #[test]
    fn test_first_matching_pattern_short_circuits() {
        assert_eq!(card_matches("GCARD-1", Some("GCARD*,(")), Ok(true));
        assert!(matches!(
            card_matches("VIP-1", Some("GCARD*,(")),
            Err(RuleError::InvalidPattern { .. })
        ));
        assert_eq!(card_matches("GCARD-1", None), Ok(false));
    }
}
