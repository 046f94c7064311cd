//! # Validation Module
//!
//! Checks a coupon definition before it is accepted into a catalog.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Bad Rule Data Is Caught                      │
//! │                                                                         │
//! │  Layer 1: Catalog authoring (THIS MODULE)                              │
//! │  ├── name, amounts, percentage range                                   │
//! │  ├── date windows                                                      │
//! │  └── every pattern compiles                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (serde)                                      │
//! │  └── unknown category, unparseable money                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine                                                       │
//! │  └── anything that slipped through: coupon skipped, warning logged     │
//! │                                                                         │
//! │  The engine never requires a validated catalog.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coupon_core::validation::validate_coupon;
//! use coupon_core::{Coupon, CouponRule, Money};
//!
//! let coupon = Coupon::new("1", "Spend 50", CouponRule::Total { min_order_amount: None })
//!     .with_fixed_amount(Money::from_units(5));
//! assert!(validate_coupon(&coupon).is_ok());
//! ```

use rust_decimal::Decimal;

use crate::cart::normalize_card;
use crate::codes::{parse_code_list, parse_pattern_list};
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::pattern::{compile_all, WildcardPattern};
use crate::types::{Coupon, CouponRule, DateWindow, Percentage};

/// Maximum length of a coupon name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Highest accepted percentage value.
pub const MAX_PERCENTAGE: i64 = 100;

/// Validates a full coupon definition, stopping at the first problem.
///
/// ## Rules
/// - Name present and at most [`MAX_NAME_LENGTH`] characters
/// - Fixed amount or percentage present, neither negative
/// - Percentage at most [`MAX_PERCENTAGE`]
/// - Minimum order amounts not negative
/// - Date windows do not end before they start
/// - Every pattern compiles
pub fn validate_coupon(coupon: &Coupon) -> ValidationResult<()> {
    validate_coupon_name(&coupon.name)?;
    validate_discount_fields(coupon.fixed_amount, coupon.percentage)?;

    // Only threshold coupons can be priced by percentage
    let percentage_allowed = matches!(
        coupon.rule,
        CouponRule::Total { .. } | CouponRule::Customer { .. }
    );
    if !percentage_allowed && coupon.fixed_amount.is_none() {
        return Err(ValidationError::Required {
            field: "fixedAmount".to_string(),
        });
    }

    validate_window("validity", &coupon.validity)?;
    validate_rule(&coupon.rule)
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a coupon display name.
///
/// ```rust
/// use coupon_core::validation::validate_coupon_name;
///
/// assert!(validate_coupon_name("Milk combo").is_ok());
/// assert!(validate_coupon_name("  ").is_err());
/// assert!(validate_coupon_name(&"A".repeat(201)).is_err());
/// ```
pub fn validate_coupon_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates the amount fields that price the discount.
pub fn validate_discount_fields(
    fixed_amount: Option<Money>,
    percentage: Option<Percentage>,
) -> ValidationResult<()> {
    if fixed_amount.is_none() && percentage.is_none() {
        return Err(ValidationError::Required {
            field: "fixedAmount or percentage".to_string(),
        });
    }

    if let Some(amount) = fixed_amount {
        validate_non_negative("fixedAmount", amount)?;
    }

    if let Some(percentage) = percentage {
        validate_percentage(percentage)?;
    }

    Ok(())
}

/// Validates a percentage is within 0..=100.
///
/// ```rust
/// use coupon_core::validation::validate_percentage;
///
/// assert!(validate_percentage("12.5".parse().unwrap()).is_ok());
/// assert!(validate_percentage("101".parse().unwrap()).is_err());
/// ```
pub fn validate_percentage(percentage: Percentage) -> ValidationResult<()> {
    let value = percentage.value();
    if value < Decimal::ZERO || value > Decimal::from(MAX_PERCENTAGE) {
        return Err(ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0,
            max: MAX_PERCENTAGE,
        });
    }
    Ok(())
}

fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that a window does not end before it starts.
pub fn validate_window(field: &str, window: &DateWindow) -> ValidationResult<()> {
    if window.is_inverted() {
        return Err(ValidationError::InvertedWindow {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Rule Validators
// =============================================================================

/// Validates the category-specific part of a coupon.
pub fn validate_rule(rule: &CouponRule) -> ValidationResult<()> {
    match rule {
        CouponRule::Combo {
            required_product_codes,
        } => {
            let patterns = parse_pattern_list(required_product_codes.as_deref());
            if patterns.is_empty() {
                return Err(ValidationError::Required {
                    field: "requiredProductCodes".to_string(),
                });
            }
            compile_all(&patterns)?;
        }

        CouponRule::Total { min_order_amount } => {
            if let Some(min) = min_order_amount {
                validate_non_negative("minOrderAmount", *min)?;
            }
        }

        CouponRule::Holiday { window, .. } => validate_window("window", window)?,

        CouponRule::Product {
            applicable_product_codes,
            product_pattern,
        } => {
            let pattern = product_pattern
                .as_deref()
                .filter(|pattern| !pattern.trim().is_empty());
            if let Some(pattern) = pattern {
                WildcardPattern::compile(pattern)?;
            }
            if pattern.is_none() && parse_code_list(applicable_product_codes.as_deref()).is_empty() {
                return Err(ValidationError::Required {
                    field: "applicableProductCodes or productPattern".to_string(),
                });
            }
        }

        CouponRule::Customer {
            card_patterns,
            min_order_amount,
        } => {
            let patterns: Vec<String> = parse_pattern_list(card_patterns.as_deref())
                .iter()
                .map(|pattern| normalize_card(pattern))
                .collect();
            if patterns.is_empty() {
                return Err(ValidationError::Required {
                    field: "cardPatterns".to_string(),
                });
            }
            compile_all(&patterns)?;
            if let Some(min) = min_order_amount {
                validate_non_negative("minOrderAmount", *min)?;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
