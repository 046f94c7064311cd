//! # In-Memory Collaborators
//!
//! Product directory and coupon catalog backed by plain JSON files.
//!
//! ## File Formats
//! ```text
//! products.json                         coupons.json
//! ─────────────                         ────────────
//! [                                     [
//!   {                                     {
//!     "id": "p-1",                          "id": "c-1",
//!     "productCode": "SUA1",                "name": "Milk combo",
//!     "name": "Fresh milk 1L",              "category": "combo",
//!     "price": "32000"                      "fixedAmount": "5000",
//!   }                                       "requiredProductCodes": "SUA*,BMI*"
//! ]                                       }
//!                                       ]
//! ```
//!
//! A catalog entry that cannot be decoded (unknown category, bad amount)
//! is logged and left out. The rest of the catalog still loads.

use async_trait::async_trait;
use chrono::NaiveDate;
use coupon_core::{CartLineItem, Coupon, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::collaborators::{CouponCatalog, ProductDirectory};
use crate::context::RequestContext;
use crate::error::UpstreamResult;

// =============================================================================
// Product Directory
// =============================================================================

/// A product as the directory stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Identifier used in pricing requests.
    pub id: String,

    /// Business code matched by coupon patterns.
    pub product_code: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Unit price.
    pub price: Money,
}

impl ProductRecord {
    fn to_line_item(&self) -> CartLineItem {
        let item = CartLineItem::new(self.product_code.clone(), self.price);
        match &self.name {
            Some(name) => item.with_name(name.clone()),
            None => item,
        }
    }
}

/// Product directory held in memory, keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductDirectory {
    products: HashMap<String, ProductRecord>,
}

impl InMemoryProductDirectory {
    /// Creates a directory from records. Later duplicates win.
    pub fn new(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        InMemoryProductDirectory {
            products: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
        }
    }

    /// Loads a JSON array of product records.
    pub fn from_json_file(path: &Path) -> UpstreamResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let records: Vec<ProductRecord> = serde_json::from_str(&contents)?;
        info!(?path, products = records.len(), "Loaded product directory");
        Ok(Self::new(records))
    }

    /// Number of known products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if no products are known.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductDirectory for InMemoryProductDirectory {
    async fn resolve_line_items(
        &self,
        ctx: &RequestContext,
        product_ids: &[String],
    ) -> UpstreamResult<Vec<CartLineItem>> {
        let mut items = Vec::with_capacity(product_ids.len());
        for id in product_ids {
            match self.products.get(id) {
                Some(record) => items.push(record.to_line_item()),
                None => {
                    debug!(request_id = %ctx.request_id, product_id = %id, "Unknown product id, skipping")
                }
            }
        }
        Ok(items)
    }
}

// =============================================================================
// Coupon Catalog
// =============================================================================

/// A catalog entry that could not be decoded into a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position in the catalog file.
    pub index: usize,

    /// The entry's `id` field, if it had a readable one.
    pub id: Option<String>,

    /// Decoder message.
    pub reason: String,
}

/// The decoded contents of a catalog file.
#[derive(Debug, Clone, Default)]
pub struct CatalogFile {
    /// Decoded coupons, in file order.
    pub coupons: Vec<Coupon>,

    /// Entries that could not be decoded.
    pub rejected: Vec<RejectedEntry>,
}

/// Decodes a JSON array of coupons entry by entry.
///
/// Fails only if the document is not a JSON array.
pub fn parse_catalog(json: &str) -> UpstreamResult<CatalogFile> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut file = CatalogFile::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        match serde_json::from_value::<Coupon>(entry) {
            Ok(coupon) => file.coupons.push(coupon),
            Err(err) => file.rejected.push(RejectedEntry {
                index,
                id,
                reason: err.to_string(),
            }),
        }
    }

    Ok(file)
}

/// Coupon catalog held in memory.
///
/// Mirrors a repository query: only coupons that are active and inside
/// their validity window on the requested date are returned.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCouponCatalog {
    coupons: Vec<Coupon>,
}

impl InMemoryCouponCatalog {
    /// Creates a catalog from coupons, keeping their order.
    pub fn new(coupons: Vec<Coupon>) -> Self {
        InMemoryCouponCatalog { coupons }
    }

    /// Loads a JSON array of coupons, skipping undecodable entries.
    pub fn from_json_file(path: &Path) -> UpstreamResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file = parse_catalog(&contents)?;

        for rejected in &file.rejected {
            warn!(
                ?path,
                index = rejected.index,
                coupon_id = rejected.id.as_deref().unwrap_or("?"),
                reason = %rejected.reason,
                "Skipping undecodable catalog entry"
            );
        }
        info!(?path, coupons = file.coupons.len(), rejected = file.rejected.len(), "Loaded coupon catalog");

        Ok(Self::new(file.coupons))
    }

    /// Every coupon in the catalog, active or not.
    pub fn all(&self) -> &[Coupon] {
        &self.coupons
    }
}

#[async_trait]
impl CouponCatalog for InMemoryCouponCatalog {
    async fn active_coupons(
        &self,
        ctx: &RequestContext,
        business_date: NaiveDate,
    ) -> UpstreamResult<Vec<Coupon>> {
        let snapshot: Vec<Coupon> = self
            .coupons
            .iter()
            .filter(|coupon| coupon.is_generally_eligible(business_date))
            .cloned()
            .collect();

        debug!(
            request_id = %ctx.request_id,
            %business_date,
            active = snapshot.len(),
            total = self.coupons.len(),
            "Captured coupon snapshot"
        );
        Ok(snapshot)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_core::{CouponRule, DateWindow};
    use std::io::Write;

    fn product(id: &str, code: &str, price: i64) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            product_code: code.to_string(),
            name: Some(format!("{code} name")),
            price: Money::from_units(price),
        }
    }

    #[tokio::test]
    async fn test_resolve_keeps_order_and_skips_unknown() {
        let directory = InMemoryProductDirectory::new([product("p1", "SUA1", 10), product("p2", "BMI1", 20)]);
        let ids = vec!["p2".to_string(), "missing".to_string(), "p1".to_string(), "p2".to_string()];

        let items = directory
            .resolve_line_items(&RequestContext::new(), &ids)
            .await
            .unwrap();

        let codes: Vec<&str> = items.iter().map(|item| item.product_code.as_str()).collect();
        assert_eq!(codes, vec!["BMI1", "SUA1", "BMI1"]);
        assert_eq!(items[1].name.as_deref(), Some("SUA1 name"));
    }

    #[tokio::test]
    async fn test_catalog_filters_inactive_and_expired() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let rule = || CouponRule::Total { min_order_amount: None };
        let catalog = InMemoryCouponCatalog::new(vec![
            Coupon::new("live", "Live", rule()),
            Coupon::new("off", "Off", rule()).deactivated(),
            Coupon::new("expired", "Expired", rule())
                .with_validity(DateWindow::between(None, Some(day(5)))),
        ]);

        let snapshot = catalog
            .active_coupons(&RequestContext::new(), day(10))
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "live");
        assert_eq!(catalog.all().len(), 3);
    }

    #[test]
    fn test_parse_catalog_rejects_bad_entries_individually() {
        let json = r#"[
            { "id": "ok", "name": "Ok", "category": "total", "fixedAmount": 5 },
            { "id": "bad", "name": "Bad", "category": "mystery" },
            { "name": "No id", "category": "total", "fixedAmount": "abc" }
        ]"#;

        let file = parse_catalog(json).unwrap();
        assert_eq!(file.coupons.len(), 1);
        assert_eq!(file.rejected.len(), 2);
        assert_eq!(file.rejected[0].index, 1);
        assert_eq!(file.rejected[0].id.as_deref(), Some("bad"));
        assert_eq!(file.rejected[1].id, None);

        assert!(parse_catalog("{}").is_err());
    }

    #[test]
    fn test_load_from_files() {
        let mut products = tempfile::NamedTempFile::new().unwrap();
        write!(
            products,
            r#"[{{ "id": "p1", "productCode": "SUA1", "price": "12.50" }}]"#
        )
        .unwrap();
        let directory = InMemoryProductDirectory::from_json_file(products.path()).unwrap();
        assert_eq!(directory.len(), 1);

        let mut coupons = tempfile::NamedTempFile::new().unwrap();
        write!(
            coupons,
            r#"[{{ "id": "c1", "name": "Combo", "category": "combo", "fixedAmount": 5, "requiredProductCodes": "SUA*" }}]"#
        )
        .unwrap();
        let catalog = InMemoryCouponCatalog::from_json_file(coupons.path()).unwrap();
        assert_eq!(catalog.all().len(), 1);

        let missing = InMemoryProductDirectory::from_json_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(crate::error::UpstreamError::ConnectionFailed(_))));
    }
}
