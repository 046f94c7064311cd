//! # Pricing Service
//!
//! Runs one pricing request end to end.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply(ctx, request)                                                    │
//! │     │                                                                   │
//! │     ├─1─► ProductDirectory.resolve_line_items(ids) ──✗──► Upstream err  │
//! │     │          │                                                        │
//! │     │          └── no items? ──► PricingResult::empty()                 │
//! │     │                                                                   │
//! │     ├─2─► business date = now in store time zone                       │
//! │     │                                                                   │
//! │     ├─3─► CouponCatalog.active_coupons(date)  ──✗──► Upstream err       │
//! │     │          (ONE snapshot for every category)                        │
//! │     │                                                                   │
//! │     └─4─► coupon_core::price(cart, snapshot, date)                     │
//! │                                                                         │
//! │  A failed step ends the request. Nothing is retried and no partial     │
//! │  result is returned.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use coupon_core::{price, Cart, Money, PricingResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::collaborators::{CouponCatalog, ProductDirectory};
use crate::config::ServiceConfig;
use crate::context::RequestContext;
use crate::error::{Collaborator, ServiceError, ServiceResult};

// =============================================================================
// Pricing Request
// =============================================================================

/// What a caller sends to have a cart priced.
///
/// ```json
/// {
///   "productIds": ["p-1", "p-7"],
///   "totalAmount": "150000",
///   "cardNumber": "GCARD-0042"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    /// Product identifiers, one per unit bought.
    pub product_ids: Vec<String>,

    /// Caller-computed total. Wins over the sum of resolved prices.
    #[serde(default)]
    pub total_amount: Option<Money>,

    /// Loyalty card as typed or scanned.
    #[serde(default)]
    pub card_number: Option<String>,
}

impl PricingRequest {
    /// Creates a request for the given product ids.
    pub fn new<I, S>(product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PricingRequest {
            product_ids: product_ids.into_iter().map(Into::into).collect(),
            total_amount: None,
            card_number: None,
        }
    }

    /// Sets the caller-computed total.
    pub fn with_total(mut self, total: Money) -> Self {
        self.total_amount = Some(total);
        self
    }

    /// Sets the loyalty card.
    pub fn with_card(mut self, card: impl Into<String>) -> Self {
        self.card_number = Some(card.into());
        self
    }
}

// =============================================================================
// Pricing Service
// =============================================================================

/// Prices carts against a consistent coupon snapshot.
///
/// Cheap to clone and safe to share across concurrent requests.
#[derive(Clone)]
pub struct PricingService {
    products: Arc<dyn ProductDirectory>,
    catalog: Arc<dyn CouponCatalog>,
    utc_offset: FixedOffset,
}

impl PricingService {
    /// Creates a service whose business day follows `utc_offset`.
    pub fn new(
        products: Arc<dyn ProductDirectory>,
        catalog: Arc<dyn CouponCatalog>,
        utc_offset: FixedOffset,
    ) -> Self {
        PricingService {
            products,
            catalog,
            utc_offset,
        }
    }

    /// Creates a service using the configured time zone.
    pub fn from_config(
        config: &ServiceConfig,
        products: Arc<dyn ProductDirectory>,
        catalog: Arc<dyn CouponCatalog>,
    ) -> ServiceResult<Self> {
        Ok(Self::new(products, catalog, config.utc_offset()?))
    }

    /// The calendar day `now` falls on in the store time zone.
    pub fn business_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }

    /// Prices a request as of the current wall-clock time.
    pub async fn apply(
        &self,
        ctx: &RequestContext,
        request: &PricingRequest,
    ) -> ServiceResult<PricingResult> {
        self.apply_at(ctx, request, Utc::now()).await
    }

    /// Prices a request as of `now`.
    ///
    /// ## Errors
    /// [`ServiceError::UpstreamUnavailable`] if either collaborator fails.
    /// The catalog is not consulted when no product resolves.
    pub async fn apply_at(
        &self,
        ctx: &RequestContext,
        request: &PricingRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<PricingResult> {
        debug!(
            request_id = %ctx.request_id,
            products = request.product_ids.len(),
            has_total = request.total_amount.is_some(),
            has_card = request.card_number.is_some(),
            "Pricing request received"
        );

        let line_items = self
            .products
            .resolve_line_items(ctx, &request.product_ids)
            .await
            .map_err(|reason| {
                warn!(request_id = %ctx.request_id, error = %reason, "Product directory unavailable");
                ServiceError::upstream(Collaborator::ProductDirectory, reason)
            })?;

        if line_items.is_empty() {
            info!(request_id = %ctx.request_id, "No products resolved, nothing to price");
            return Ok(PricingResult::empty());
        }

        let business_date = self.business_date(now);
        let snapshot = self
            .catalog
            .active_coupons(ctx, business_date)
            .await
            .map_err(|reason| {
                warn!(request_id = %ctx.request_id, error = %reason, "Coupon catalog unavailable");
                ServiceError::upstream(Collaborator::CouponCatalog, reason)
            })?;

        let cart = Cart {
            line_items,
            declared_total: request.total_amount,
            card_identifier: request.card_number.clone(),
        };

        let result = price(&cart, &snapshot, business_date);

        info!(
            request_id = %ctx.request_id,
            %business_date,
            coupons = snapshot.len(),
            applied = result.applied_discounts.len(),
            total_discount = %result.total_discount,
            final_total = %result.final_total,
            "Cart priced"
        );

        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
