//! Pricing requests end to end against the fixture catalog.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{FixedOffset, TimeZone, Utc};
use coupon_core::validation::validate_coupon;
use coupon_core::{CouponCategory, Money};
use coupon_service::collaborators::{MockCouponCatalog, MockProductDirectory};
use coupon_service::memory::{parse_catalog, InMemoryCouponCatalog, InMemoryProductDirectory};
use coupon_service::{
    Collaborator, PricingRequest, PricingService, RequestContext, ServiceError, UpstreamError,
};
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

fn fixture_service(offset_minutes: i32) -> PricingService {
    let products = InMemoryProductDirectory::from_json_file(&fixture("products.json")).unwrap();
    let catalog = InMemoryCouponCatalog::from_json_file(&fixture("coupons.json")).unwrap();
    PricingService::new(
        Arc::new(products),
        Arc::new(catalog),
        FixedOffset::east_opt(offset_minutes * 60).unwrap(),
    )
}

#[tokio::test]
async fn test_full_cart_during_tet() {
    let service = fixture_service(420);
    let now = Utc.with_ymd_and_hms(2024, 2, 10, 5, 0, 0).unwrap();
    let request = PricingRequest::new(["p-1", "p-3", "p-4"]).with_card("gcard-0042");

    let result = service
        .apply_at(&RequestContext::new(), &request, now)
        .await
        .unwrap();

    let ids: Vec<&str> = result
        .applied_discounts
        .iter()
        .map(|discount| discount.coupon_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "combo-breakfast",
            "total-100k",
            "holiday-tet",
            "customer-gold",
            "product-milk",
            "product-coffee",
        ]
    );

    assert_eq!(result.original_total, Money::new(dec!(145000)));
    assert_eq!(result.total_discount, Money::new(dec!(52250)));
    assert_eq!(result.final_total, Money::new(dec!(92750)));

    let customer: Vec<_> = result.discounts_for(CouponCategory::Customer).collect();
    assert_eq!(customer[0].amount, Money::new(dec!(7250.00)));
}

#[tokio::test]
async fn test_holiday_follows_store_time_zone() {
    // 20:00 UTC on the last day of Tet is already the next day at UTC+07:00
    let now = Utc.with_ymd_and_hms(2024, 2, 14, 20, 0, 0).unwrap();
    let request = PricingRequest::new(["p-5"]);

    let in_utc = fixture_service(0)
        .apply_at(&RequestContext::new(), &request, now)
        .await
        .unwrap();
    assert_eq!(in_utc.discounts_for(CouponCategory::Holiday).count(), 1);

    let in_store_zone = fixture_service(420)
        .apply_at(&RequestContext::new(), &request, now)
        .await
        .unwrap();
    assert_eq!(in_store_zone.discounts_for(CouponCategory::Holiday).count(), 0);
}

#[tokio::test]
async fn test_declared_total_unlocks_percentage_tier() {
    let service = fixture_service(0);
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let request = PricingRequest::new(["p-4"]).with_total(Money::new(dec!(200000)));

    let result = service
        .apply_at(&RequestContext::new(), &request, now)
        .await
        .unwrap();

    let total: Vec<_> = result.discounts_for(CouponCategory::Total).collect();
    assert_eq!(total.len(), 1);
    assert_eq!(total[0].coupon_id, "total-150k");
    assert_eq!(total[0].amount, Money::new(dec!(20000)));
    assert_eq!(result.original_total, Money::new(dec!(200000)));
}

#[tokio::test]
async fn test_unknown_products_price_to_zero() {
    let result = fixture_service(0)
        .apply(&RequestContext::new(), &PricingRequest::new(["nope", "missing"]))
        .await
        .unwrap();

    assert!(result.applied_discounts.is_empty());
    assert_eq!(result.final_total, Money::zero());
}

#[tokio::test]
async fn test_concurrent_requests_share_one_service() {
    let service = fixture_service(420);
    let now = Utc.with_ymd_and_hms(2024, 2, 10, 5, 0, 0).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .apply_at(&RequestContext::new(), &PricingRequest::new(["p-1", "p-3"]), now)
                    .await
            })
        })
        .collect();

    let mut finals = Vec::new();
    for handle in handles {
        finals.push(handle.await.unwrap().unwrap().final_total);
    }

    assert!(finals.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_catalog_outage_fails_whole_request() {
    let mut products = MockProductDirectory::new();
    products.expect_resolve_line_items().returning(|_, _| {
        Ok(vec![coupon_core::CartLineItem::new("SUA1", Money::from_units(10))])
    });

    let mut catalog = MockCouponCatalog::new();
    catalog
        .expect_active_coupons()
        .once()
        .returning(|_, _| Err(UpstreamError::Timeout(3)));

    let service = PricingService::new(
        Arc::new(products),
        Arc::new(catalog),
        FixedOffset::east_opt(0).unwrap(),
    );

    let err = service
        .apply(&RequestContext::new(), &PricingRequest::new(["p-1"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::UpstreamUnavailable {
            collaborator: Collaborator::CouponCatalog,
            reason: UpstreamError::Timeout(3),
        }
    ));
    assert_eq!(
        err.to_string(),
        "coupon catalog unavailable: timed out after 3 seconds"
    );
}

#[test]
fn test_fixture_catalog_check() {
    let contents = std::fs::read_to_string(fixture("coupons.json")).unwrap();
    let file = parse_catalog(&contents).unwrap();

    assert!(file.rejected.is_empty());

    let invalid: Vec<&str> = file
        .coupons
        .iter()
        .filter(|coupon| validate_coupon(coupon).is_err())
        .map(|coupon| coupon.id.as_str())
        .collect();
    assert_eq!(invalid, vec!["combo-broken"]);
}
