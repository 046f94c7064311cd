//! # coupon-core: Pure Discount Resolution
//!
//! This crate decides which coupons apply to a cart and what the cart
//! finally costs. It contains all pricing rules as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coupon Engine Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    coupon-cli / callers                         │   │
//! │  │          price SUA1 BMI2 --card GCARD-1    check catalog.json   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 coupon-service (PricingService)                 │   │
//! │  │   ProductDirectory ──► Cart      CouponCatalog ──► snapshot     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ coupon-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  engine   │  │ validation│  │   │
//! │  │   │  Coupon   │  │   Money   │  │  price()  │  │  coupon   │  │   │
//! │  │   │CouponRule │  │Percentage │  │ selectors │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Coupon, CouponRule, CouponCategory, Percentage, DateWindow
//! - [`money`] - Exact decimal Money
//! - [`cart`] - Cart input and PricingResult output
//! - [`pattern`] - Wildcard pattern matching
//! - [`codes`] - Code and card list parsing
//! - [`engine`] - Category selectors, product stacker, aggregator
//! - [`validation`] - Coupon definition checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same cart, coupons and date = same result
//! 2. **No Clock**: the business date is always an argument
//! 3. **Decimal Money**: exact base-10 amounts, rounded once at the discount
//! 4. **Skip, Don't Fail**: a malformed coupon never fails the whole cart
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use coupon_core::{price, Cart, CartLineItem, Coupon, CouponRule, Money};
//!
//! let cart = Cart::new(vec![
//!     CartLineItem::new("SUA1", Money::from_units(12)),
//!     CartLineItem::new("BMI1", Money::from_units(8)),
//! ]);
//!
//! let combo = Coupon::new(
//!     "milk-combo",
//!     "Milk combo",
//!     CouponRule::Combo { required_product_codes: Some("SUA*,BMI*".to_string()) },
//! )
//! .with_fixed_amount(Money::from_units(5));
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let result = price(&cart, &[combo], today);
//!
//! assert_eq!(result.final_total, Money::from_units(15));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod codes;
pub mod engine;
pub mod error;
pub mod money;
pub mod pattern;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use coupon_core::Money` instead of
// `use coupon_core::money::Money`

pub use cart::{AppliedDiscount, Cart, CartLineItem, PricingResult};
pub use engine::price;
pub use error::{RuleError, ValidationError};
pub use money::Money;
pub use types::*;
