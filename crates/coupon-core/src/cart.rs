//! # Cart & Pricing Result
//!
//! The priced cart handed to the engine and the itemised result it returns.
//!
//! ## Request / Response Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart                                  PricingResult                    │
//! │  ────                                  ─────────────                    │
//! │  line_items: [                         applied_discounts: [             │
//! │    { SUA1, 12.00 },        price()       { combo,   "Milk combo", 5 }, │
//! │    { BMI1,  8.00 },     ───────────►     { product, "SUA -1", 2,       │
//! │  ]                                         matched: [SUA1] },           │
//! │  declared_total?: 20.00                ]                                │
//! │  card_identifier?: "GCARD-77"          total_discount:  7.00            │
//! │                                        original_total: 20.00            │
//! │                                        final_total:    13.00            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::CouponCategory;

// =============================================================================
// Cart Line Item
// =============================================================================

/// One resolved product in the cart.
///
/// Quantity is implicitly one: a product bought twice is two line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Business product code matched by coupon patterns (e.g. `SUA1`).
    pub product_code: String,

    /// Display name, if the product directory supplied one.
    #[serde(default)]
    pub name: Option<String>,

    /// Price of one unit.
    pub unit_price: Money,
}

impl CartLineItem {
    /// Creates a line item without a display name.
    pub fn new(product_code: impl Into<String>, unit_price: Money) -> Self {
        CartLineItem {
            product_code: product_code.into(),
            name: None,
            unit_price,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A cart ready for pricing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Resolved line items.
    pub line_items: Vec<CartLineItem>,

    /// Total supplied by the caller; wins over the computed sum.
    #[serde(default)]
    pub declared_total: Option<Money>,

    /// Raw loyalty card identifier, as typed or scanned.
    #[serde(default)]
    pub card_identifier: Option<String>,
}

impl Cart {
    /// Creates a cart from line items.
    pub fn new(line_items: Vec<CartLineItem>) -> Self {
        Cart {
            line_items,
            declared_total: None,
            card_identifier: None,
        }
    }

    /// Sets the caller-declared total.
    pub fn with_declared_total(mut self, total: Money) -> Self {
        self.declared_total = Some(total);
        self
    }

    /// Sets the loyalty card identifier.
    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card_identifier = Some(card.into());
        self
    }

    /// Returns true if there is nothing to price.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Sum of all line item prices, saturating at the decimal range.
    pub fn computed_total(&self) -> Money {
        self.line_items.iter().map(|item| item.unit_price).sum()
    }

    /// The total used for minimum-order checks and percentages:
    /// the declared total if present, else the computed sum.
    ///
    /// ```rust
    /// use coupon_core::{Cart, CartLineItem, Money};
    ///
    /// let cart = Cart::new(vec![
    ///     CartLineItem::new("A1", Money::from_units(3)),
    ///     CartLineItem::new("B1", Money::from_units(4)),
    /// ]);
    /// assert_eq!(cart.reference_total(), Money::from_units(7));
    ///
    /// let declared = cart.with_declared_total(Money::from_units(10));
    /// assert_eq!(declared.reference_total(), Money::from_units(10));
    /// ```
    pub fn reference_total(&self) -> Money {
        self.declared_total.unwrap_or_else(|| self.computed_total())
    }

    /// The card identifier trimmed and upper-cased, or `None` if blank.
    pub fn normalized_card(&self) -> Option<String> {
        self.card_identifier
            .as_deref()
            .map(normalize_card)
            .filter(|card| !card.is_empty())
    }
}

/// Card comparison is case-insensitive and ignores surrounding whitespace.
pub fn normalize_card(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// =============================================================================
// Applied Discount
// =============================================================================

/// One discount that contributed to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    /// Catalog id of the coupon that produced this discount.
    pub coupon_id: String,

    /// Category the coupon was selected under.
    pub category: CouponCategory,

    /// Coupon display name.
    pub name: String,

    /// Discount amount (already computed, never negative).
    pub amount: Money,

    /// Coupon description.
    #[serde(default)]
    pub description: Option<String>,

    /// Codes of the line items discounted. Product category only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_product_codes: Option<Vec<String>>,
}

// =============================================================================
// Pricing Result
// =============================================================================

/// The outcome of pricing one cart.
///
/// ## Invariants
/// - `total_discount` is the sum of every applied amount
/// - `final_total = max(original_total - total_discount, 0)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub applied_discounts: Vec<AppliedDiscount>,
    pub total_discount: Money,
    pub original_total: Money,
    pub final_total: Money,
}

impl PricingResult {
    /// The result for an empty cart: no discounts, every total zero.
    pub fn empty() -> Self {
        PricingResult {
            applied_discounts: Vec::new(),
            total_discount: Money::zero(),
            original_total: Money::zero(),
            final_total: Money::zero(),
        }
    }

    /// Discounts applied under one category.
    pub fn discounts_for(&self, category: CouponCategory) -> impl Iterator<Item = &AppliedDiscount> {
        self.applied_discounts
            .iter()
            .filter(move |discount| discount.category == category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_total() {
        let cart = Cart::new(vec![
            CartLineItem::new("SUA1", Money::from_cents(1250)),
            CartLineItem::new("BMI1", Money::from_cents(750)),
        ]);
        assert_eq!(cart.computed_total(), Money::from_cents(2000));
        assert_eq!(cart.reference_total(), Money::from_cents(2000));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_computed_total_saturates() {
        let max = Money::new(rust_decimal::Decimal::MAX);
        let cart = Cart::new(vec![CartLineItem::new("SUA1", max), CartLineItem::new("SUA2", max)]);
        assert_eq!(cart.computed_total(), max);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.computed_total(), Money::zero());
    }

    #[test]
    fn test_card_normalization() {
        let cart = Cart::new(Vec::new()).with_card("  gcard-77 ");
        assert_eq!(cart.normalized_card().as_deref(), Some("GCARD-77"));

        let blank = Cart::new(Vec::new()).with_card("   ");
        assert_eq!(blank.normalized_card(), None);

        assert_eq!(Cart::default().normalized_card(), None);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = PricingResult {
            applied_discounts: vec![AppliedDiscount {
                coupon_id: "1".to_string(),
                category: CouponCategory::Product,
                name: "SUA".to_string(),
                amount: Money::from_units(10),
                description: None,
                matched_product_codes: Some(vec!["SUA1".to_string()]),
            }],
            total_discount: Money::from_units(10),
            original_total: Money::from_units(30),
            final_total: Money::from_units(20),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["appliedDiscounts"][0]["category"], "product");
        assert_eq!(json["appliedDiscounts"][0]["matchedProductCodes"][0], "SUA1");
        assert_eq!(json["finalTotal"], "20");
    }

    #[test]
    fn test_matched_codes_omitted_when_absent() {
        let discount = AppliedDiscount {
            coupon_id: "2".to_string(),
            category: CouponCategory::Total,
            name: "Big basket".to_string(),
            amount: Money::from_units(5),
            description: Some("5 off".to_string()),
            matched_product_codes: None,
        };
        let json = serde_json::to_value(&discount).unwrap();
        assert!(json.get("matchedProductCodes").is_none());
    }
}
