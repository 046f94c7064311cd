//! # Collaborators
//!
//! The two external sources a pricing request depends on.
//!
//! ```text
//! ┌──────────────────────┐          ┌──────────────────────┐
//! │   ProductDirectory   │          │    CouponCatalog     │
//! │  ids ──► line items  │          │  date ──► snapshot   │
//! └──────────┬───────────┘          └──────────┬───────────┘
//!            │                                 │
//!            └──────────► PricingService ◄─────┘
//! ```
//!
//! Both are async and may fail with an [`UpstreamError`]. Implementations
//! own their own timeouts. The service does not retry.

use async_trait::async_trait;
use chrono::NaiveDate;
use coupon_core::{CartLineItem, Coupon};
use mockall::automock;

use crate::context::RequestContext;
use crate::error::UpstreamResult;

/// Resolves product identifiers into priced line items.
#[automock]
#[async_trait]
pub trait ProductDirectory: Send + Sync {
    /// Resolves every identifier it knows, in request order.
    ///
    /// Unknown identifiers are left out rather than failing the request.
    async fn resolve_line_items(
        &self,
        ctx: &RequestContext,
        product_ids: &[String],
    ) -> UpstreamResult<Vec<CartLineItem>>;
}

/// Supplies the coupons active on a business date.
#[automock]
#[async_trait]
pub trait CouponCatalog: Send + Sync {
    /// Returns one snapshot of active coupons, in catalog order.
    ///
    /// The engine re-checks every window itself, so an implementation may
    /// return more than is strictly eligible.
    async fn active_coupons(
        &self,
        ctx: &RequestContext,
        business_date: NaiveDate,
    ) -> UpstreamResult<Vec<Coupon>>;
}
