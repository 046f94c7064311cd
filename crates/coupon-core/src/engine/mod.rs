//! # Pricing Engine
//!
//! Resolves which coupons apply to a cart and what the cart finally costs.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         price(cart, coupons, date)                      │
//! │                                                                         │
//! │  Cart ──► empty? ──yes──► PricingResult::empty()                        │
//! │             │                                                           │
//! │             no                                                          │
//! │             ▼                                                           │
//! │  Coupons ──► active && date in validity? (general eligibility)          │
//! │             │                                                           │
//! │             ├──► combo::select     ─┐                                   │
//! │             ├──► total::select      │  0 or 1 discount each             │
//! │             ├──► holiday::select    │  (best value, then priority)      │
//! │             ├──► customer::select  ─┘                                   │
//! │             └──► product::stack    ──  0..n discounts (all eligible)    │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                        aggregate::summarize                             │
//! │                  final = max(original - discounts, 0)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! `price` never reads the clock or any global state. The business date is
//! an argument, so the same inputs always produce the same result.

pub mod aggregate;
pub mod combo;
pub mod customer;
pub mod holiday;
pub mod product;
pub mod total;

mod select;

use chrono::NaiveDate;
use tracing::debug;

use crate::cart::{Cart, CartLineItem, PricingResult};
use crate::money::Money;
use crate::types::Coupon;

/// Everything a selector needs to know about the cart being priced.
#[derive(Debug, Clone)]
pub struct PricingContext<'a> {
    /// Resolved line items.
    pub line_items: &'a [CartLineItem],

    /// Declared total, or the sum of line item prices.
    pub reference_total: Money,

    /// The calendar day the cart is priced on.
    pub business_date: NaiveDate,

    /// Trimmed, upper-cased card identifier. `None` when blank.
    pub card: Option<String>,
}

impl<'a> PricingContext<'a> {
    /// Builds the context for a cart on a given business date.
    pub fn new(cart: &'a Cart, business_date: NaiveDate) -> Self {
        PricingContext {
            line_items: &cart.line_items,
            reference_total: cart.reference_total(),
            business_date,
            card: cart.normalized_card(),
        }
    }
}

/// Coupons that may be evaluated at all on `day`, in catalog order.
pub fn generally_eligible(coupons: &[Coupon], day: NaiveDate) -> Vec<&Coupon> {
    coupons
        .iter()
        .filter(|coupon| coupon.is_generally_eligible(day))
        .collect()
}

/// Prices a cart against a coupon snapshot.
///
/// ## Behavior
/// - Empty cart: zero result, coupons are not evaluated
/// - Combo, Total, Holiday, Customer: at most one discount each
/// - Product: every eligible coupon contributes
/// - Malformed coupons are skipped with a warning, never raised
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use coupon_core::{price, Cart, CartLineItem, Coupon, CouponRule, Money};
///
/// let cart = Cart::new(vec![
///     CartLineItem::new("SUA1", Money::from_units(30)),
///     CartLineItem::new("SUA2", Money::from_units(30)),
/// ]);
/// let coupons = vec![Coupon::new(
///     "big-basket",
///     "Spend 50, save 10",
///     CouponRule::Total { min_order_amount: Some(Money::from_units(50)) },
/// )
/// .with_fixed_amount(Money::from_units(10))];
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let result = price(&cart, &coupons, today);
///
/// assert_eq!(result.total_discount, Money::from_units(10));
/// assert_eq!(result.final_total, Money::from_units(50));
/// ```
pub fn price(cart: &Cart, coupons: &[Coupon], business_date: NaiveDate) -> PricingResult {
    if cart.is_empty() {
        debug!("cart has no line items, skipping coupon evaluation");
        return PricingResult::empty();
    }

    let ctx = PricingContext::new(cart, business_date);
    let eligible = generally_eligible(coupons, business_date);
    debug!(
        line_items = ctx.line_items.len(),
        reference_total = %ctx.reference_total,
        coupons = coupons.len(),
        eligible = eligible.len(),
        %business_date,
        "pricing cart"
    );

    let mut applied = Vec::new();
    applied.extend(combo::select(&eligible, &ctx));
    applied.extend(total::select(&eligible, &ctx));
    applied.extend(holiday::select(&eligible, &ctx));
    applied.extend(customer::select(&eligible, &ctx));
    applied.extend(product::stack(&eligible, &ctx));

    aggregate::summarize(ctx.reference_total, applied)
}

// =============================================================================
// Unit Tests
// =============================================================================
