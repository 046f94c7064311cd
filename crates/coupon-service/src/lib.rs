//! # coupon-service: Request Handling for the Coupon Engine
//!
//! Wraps the pure [`coupon_core::price`] function with everything a real
//! request needs: product resolution, one coupon snapshot per request,
//! the store's business date, configuration and logging.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        coupon-service                                   │
//! │                                                                         │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────────────┐   │
//! │   │   context    │   │    config    │   │        telemetry         │   │
//! │   │ request id,  │   │ TOML + env   │   │ tracing-subscriber init  │   │
//! │   │ credential   │   │ overrides    │   │                          │   │
//! │   └──────┬───────┘   └──────┬───────┘   └──────────────────────────┘   │
//! │          │                  │                                           │
//! │   ┌──────▼──────────────────▼───────────────────────────────────────┐  │
//! │   │                    service::PricingService                      │  │
//! │   └──────┬───────────────────────────────────────────┬──────────────┘  │
//! │          │                                           │                  │
//! │   ┌──────▼───────────────┐                 ┌─────────▼────────────┐    │
//! │   │ collaborators (traits)│ ◄── memory ──► │ JSON-file backed     │    │
//! │   │ ProductDirectory      │                │ implementations      │    │
//! │   │ CouponCatalog         │                └──────────────────────┘    │
//! │   └───────────────────────┘                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::FixedOffset;
//! use coupon_core::{Coupon, CouponRule, Money};
//! use coupon_service::{
//!     InMemoryCouponCatalog, InMemoryProductDirectory, PricingRequest, PricingService,
//!     ProductRecord, RequestContext,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let products = InMemoryProductDirectory::new([ProductRecord {
//!     id: "p-1".into(),
//!     product_code: "SUA1".into(),
//!     name: None,
//!     price: Money::from_units(60),
//! }]);
//! let catalog = InMemoryCouponCatalog::new(vec![Coupon::new(
//!     "c-1",
//!     "Spend 50",
//!     CouponRule::Total { min_order_amount: Some(Money::from_units(50)) },
//! )
//! .with_fixed_amount(Money::from_units(10))]);
//!
//! let service = PricingService::new(
//!     Arc::new(products),
//!     Arc::new(catalog),
//!     FixedOffset::east_opt(0).unwrap(),
//! );
//! let result = service
//!     .apply(&RequestContext::new(), &PricingRequest::new(["p-1"]))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.final_total, Money::from_units(50));
//! # });
//! ```

pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod service;
pub mod telemetry;

pub use collaborators::{CouponCatalog, ProductDirectory};
pub use config::ServiceConfig;
pub use context::{Credential, RequestContext};
pub use error::{
    Collaborator, ConfigError, ErrorCode, ErrorReport, ServiceError, ServiceResult, UpstreamError,
};
pub use memory::{parse_catalog, InMemoryCouponCatalog, InMemoryProductDirectory, ProductRecord};
pub use service::{PricingRequest, PricingService};
