//! # Domain Types
//!
//! Coupon definitions as the engine reads them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Coupon Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │        Coupon            │      │       CouponRule (tag)       │    │
//! │  │  ──────────────────────  │      │  ──────────────────────────  │    │
//! │  │  id, name, description   │      │  Combo    { required codes } │    │
//! │  │  fixed_amount?           │─────►│  Total    { min order }      │    │
//! │  │  percentage?             │      │  Holiday  { window }         │    │
//! │  │  active, validity        │      │  Product  { codes, pattern } │    │
//! │  │  priority                │      │  Customer { cards, min order}│    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │ CouponCategory  │   │   DateWindow    │       │
//! │  │  10 = 10%       │   │  combo | total  │   │  start? end?    │       │
//! │  └─────────────────┘   │  holiday | ...  │   │  (inclusive)    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Pattern Lists
//! Code and card lists are kept exactly as the catalog stores them (a JSON
//! array or a comma-separated string). They are parsed during evaluation by
//! [`crate::codes`], so one badly stored list can only ever knock out its
//! own coupon.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage discount where `10` means 10%.
///
/// Kept as a decimal so fractional rates (12.5%) are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(#[ts(type = "string")] Decimal);

impl Percentage {
    /// Creates a percentage from its numeric value (10 = 10%).
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percentage(value)
    }

    /// Returns the numeric value (10 = 10%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the rate is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for Percentage {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim().trim_end_matches('%')).map(Percentage)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Coupon Category
// =============================================================================

/// The category a coupon belongs to. Determines which selector sees it.
///
/// ## Selection Policy
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  WINNER-TAKES-ONE                      STACKING                         │
/// │  ────────────────                      ────────                         │
/// │  Combo     best fixed amount           Product   every eligible coupon  │
/// │  Total     best computed value                   applies, once per      │
/// │  Holiday   best fixed amount                     matching line item     │
/// │  Customer  best computed value                                          │
/// │                                                                         │
/// │  Ties: higher priority wins, then earlier catalog position              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CouponCategory {
    /// Requires a set of products to be bought together.
    Combo,
    /// Requires a minimum order total.
    Total,
    /// Valid only inside a holiday date window.
    Holiday,
    /// Discounts individual matching products (stacks).
    Product,
    /// Requires a matching loyalty card.
    Customer,
}

impl CouponCategory {
    /// All categories, in the order the engine evaluates them.
    pub const ALL: [CouponCategory; 5] = [
        CouponCategory::Combo,
        CouponCategory::Total,
        CouponCategory::Holiday,
        CouponCategory::Customer,
        CouponCategory::Product,
    ];

    /// Returns true if every eligible coupon of this category applies.
    pub fn is_stacking(&self) -> bool {
        matches!(self, CouponCategory::Product)
    }

    /// The lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponCategory::Combo => "combo",
            CouponCategory::Total => "total",
            CouponCategory::Holiday => "holiday",
            CouponCategory::Product => "product",
            CouponCategory::Customer => "customer",
        }
    }
}

impl fmt::Display for CouponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "combo" => Ok(CouponCategory::Combo),
            "total" => Ok(CouponCategory::Total),
            "holiday" => Ok(CouponCategory::Holiday),
            "product" => Ok(CouponCategory::Product),
            "customer" => Ok(CouponCategory::Customer),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: CouponCategory::ALL
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Date Window
// =============================================================================

/// An inclusive calendar-date window. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    /// First day the window is open (inclusive).
    #[serde(default)]
    pub start: Option<NaiveDate>,

    /// Last day the window is open (inclusive).
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// A window with no bounds at all.
    pub const fn unbounded() -> Self {
        DateWindow {
            start: None,
            end: None,
        }
    }

    /// A window between two optional bounds.
    pub const fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateWindow { start, end }
    }

    /// Checks whether `day` falls inside the window (both ends inclusive).
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use coupon_core::types::DateWindow;
    ///
    /// let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    /// let window = DateWindow::between(Some(jan(1)), Some(jan(10)));
    ///
    /// assert!(window.contains(jan(1)));
    /// assert!(window.contains(jan(10)));
    /// assert!(!window.contains(jan(15)));
    /// ```
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.map_or(true, |start| day >= start) && self.end.map_or(true, |end| day <= end)
    }

    /// Returns true when both bounds are set and the end precedes the start.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if end < start)
    }
}

// =============================================================================
// Coupon Rule
// =============================================================================

/// Category-specific eligibility data.
///
/// One variant per [`CouponCategory`], so a coupon can never carry the
/// conditions of a category it does not belong to. On the wire the variant
/// is the `category` field of the coupon record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CouponRule {
    /// Every pattern must match at least one cart line item.
    Combo {
        /// Raw pattern list: `["SUA*","BMI*"]` or `SUA*,BMI*`.
        #[serde(default)]
        required_product_codes: Option<String>,
    },

    /// Reference total must reach the minimum.
    Total {
        #[serde(default)]
        min_order_amount: Option<Money>,
    },

    /// Business date must fall inside the holiday window.
    Holiday {
        /// Display code such as `TET` or `NOEL`. Not used for matching.
        #[serde(default)]
        holiday_code: Option<String>,
        #[serde(default)]
        window: DateWindow,
    },

    /// Line items whose code is listed or matches the pattern are discounted.
    Product {
        /// Raw JSON array of exact product codes.
        #[serde(default)]
        applicable_product_codes: Option<String>,
        /// Wildcard pattern such as `SUA*`.
        #[serde(default)]
        product_pattern: Option<String>,
    },

    /// The cart's loyalty card must match one of the patterns.
    Customer {
        /// Raw pattern list: `["GCARD*"]` or `GCARD*,VIP*`.
        #[serde(default)]
        card_patterns: Option<String>,
        #[serde(default)]
        min_order_amount: Option<Money>,
    },
}

impl CouponRule {
    /// The category this rule belongs to.
    pub fn category(&self) -> CouponCategory {
        match self {
            CouponRule::Combo { .. } => CouponCategory::Combo,
            CouponRule::Total { .. } => CouponCategory::Total,
            CouponRule::Holiday { .. } => CouponCategory::Holiday,
            CouponRule::Product { .. } => CouponCategory::Product,
            CouponRule::Customer { .. } => CouponCategory::Customer,
        }
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A discount rule as stored in the coupon catalog.
///
/// Read-only to the engine. `fixed_amount` takes priority over
/// `percentage` wherever both are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Catalog identifier.
    pub id: String,

    /// Display name shown on the receipt.
    pub name: String,

    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,

    /// Fixed discount amount.
    #[serde(default)]
    pub fixed_amount: Option<Money>,

    /// Percentage of the reference total (Total and Customer only).
    #[serde(default)]
    pub percentage: Option<Percentage>,

    /// Category and its eligibility data.
    #[serde(flatten)]
    pub rule: CouponRule,

    /// Soft on/off switch.
    #[serde(default = "default_active")]
    pub active: bool,

    /// General visibility window, independent of any holiday window.
    #[serde(default)]
    pub validity: DateWindow,

    /// Tie-break weight: higher wins among equal discounts.
    #[serde(default)]
    pub priority: i32,
}

fn default_active() -> bool {
    true
}

impl Coupon {
    /// Creates an active, always-valid coupon with no amounts set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rule: CouponRule) -> Self {
        Coupon {
            id: id.into(),
            name: name.into(),
            description: None,
            fixed_amount: None,
            percentage: None,
            rule,
            active: true,
            validity: DateWindow::unbounded(),
            priority: 0,
        }
    }

    /// Sets the fixed discount amount.
    pub fn with_fixed_amount(mut self, amount: Money) -> Self {
        self.fixed_amount = Some(amount);
        self
    }

    /// Sets the percentage discount.
    pub fn with_percentage(mut self, percentage: Percentage) -> Self {
        self.percentage = Some(percentage);
        self
    }

    /// Sets the tie-break priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the general validity window.
    pub fn with_validity(mut self, validity: DateWindow) -> Self {
        self.validity = validity;
        self
    }

    /// Turns the soft switch off.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// The coupon's category.
    #[inline]
    pub fn category(&self) -> CouponCategory {
        self.rule.category()
    }

    /// Whether the coupon may be evaluated at all on `day`: active and
    /// inside its validity window. Category conditions are checked later.
    pub fn is_generally_eligible(&self, day: NaiveDate) -> bool {
        self.active && self.validity.contains(day)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percentage_parsing() {
        assert_eq!("10".parse::<Percentage>().unwrap(), Percentage::new(dec!(10)));
        assert_eq!("12.5%".parse::<Percentage>().unwrap(), Percentage::new(dec!(12.5)));
        assert!("ten".parse::<Percentage>().is_err());
        assert_eq!(Percentage::new(dec!(15)).to_string(), "15%");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("combo".parse::<CouponCategory>().unwrap(), CouponCategory::Combo);
        assert_eq!("TOTAL".parse::<CouponCategory>().unwrap(), CouponCategory::Total);
        assert_eq!(" Customer ".parse::<CouponCategory>().unwrap(), CouponCategory::Customer);
        assert!("bogus".parse::<CouponCategory>().is_err());
    }

    #[test]
    fn test_only_product_stacks() {
        for category in CouponCategory::ALL {
            assert_eq!(category.is_stacking(), category == CouponCategory::Product);
        }
    }

    #[test]
    fn test_date_window_bounds() {
        let window = DateWindow::between(Some(day(2024, 1, 1)), Some(day(2024, 1, 10)));
        assert!(window.contains(day(2024, 1, 1)));
        assert!(window.contains(day(2024, 1, 5)));
        assert!(window.contains(day(2024, 1, 10)));
        assert!(!window.contains(day(2023, 12, 31)));
        assert!(!window.contains(day(2024, 1, 15)));

        let open_start = DateWindow::between(None, Some(day(2024, 1, 10)));
        assert!(open_start.contains(day(1999, 1, 1)));

        assert!(DateWindow::unbounded().contains(day(2024, 6, 1)));
        assert!(!window.is_inverted());
        assert!(DateWindow::between(Some(day(2024, 2, 1)), Some(day(2024, 1, 1))).is_inverted());
    }

    #[test]
    fn test_general_eligibility() {
        let coupon = Coupon::new("c1", "Any", CouponRule::Total { min_order_amount: None })
            .with_validity(DateWindow::between(Some(day(2024, 1, 1)), None));

        assert!(coupon.is_generally_eligible(day(2024, 3, 1)));
        assert!(!coupon.is_generally_eligible(day(2023, 3, 1)));
        assert!(!coupon.deactivated().is_generally_eligible(day(2024, 3, 1)));
    }

    #[test]
    fn test_coupon_deserializes_from_catalog_json() {
        let json = r#"{
            "id": "42",
            "name": "Milk combo",
            "category": "combo",
            "fixedAmount": "15000",
            "requiredProductCodes": "[\"SUA*\",\"BMI*\"]",
            "priority": 3
        }"#;

        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(coupon.category(), CouponCategory::Combo);
        assert_eq!(coupon.fixed_amount, Some(Money::from_units(15000)));
        assert_eq!(coupon.priority, 3);
        assert!(coupon.active);
        assert_eq!(
            coupon.rule,
            CouponRule::Combo {
                required_product_codes: Some(r#"["SUA*","BMI*"]"#.to_string())
            }
        );
    }

    #[test]
    fn test_holiday_coupon_json() {
        let json = r#"{
            "id": "7",
            "name": "Tet",
            "category": "holiday",
            "fixedAmount": 20,
            "holidayCode": "TET",
            "window": { "start": "2024-02-08", "end": "2024-02-14" },
            "active": false
        }"#;

        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert!(!coupon.active);
        match coupon.rule {
            CouponRule::Holiday { holiday_code, window } => {
                assert_eq!(holiday_code.as_deref(), Some("TET"));
                assert!(window.contains(day(2024, 2, 10)));
            }
            other => panic!("unexpected rule: {other:?}"),
        }
    }
}
