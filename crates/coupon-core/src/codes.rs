//! # Code List Parsing
//!
//! Coupons store product-code and card lists as free text. Two formats
//! occur in real catalogs:
//!
//! ```text
//! JSON array           ["SUA*","BMI*"]
//! Comma-separated      SUA*, BMI*
//! ```
//!
//! Parsing never fails. Input that cannot be read yields an empty list and
//! the coupon simply finds nothing to match.

use tracing::trace;

/// Parses a pattern list (combo codes, card patterns).
///
/// 1. Try a JSON array of strings.
/// 2. Otherwise split on commas.
///
/// Entries are trimmed and blank entries dropped.
///
/// ## Example
/// ```rust
/// use coupon_core::codes::parse_pattern_list;
///
/// assert_eq!(parse_pattern_list(Some(r#"["SUA*","BMI*"]"#)), vec!["SUA*", "BMI*"]);
/// assert_eq!(parse_pattern_list(Some("SUA*, BMI*")), vec!["SUA*", "BMI*"]);
/// assert!(parse_pattern_list(None).is_empty());
/// ```
pub fn parse_pattern_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(entries) => clean(entries),
        Err(err) => {
            trace!(%err, "pattern list is not a JSON array, splitting on commas");
            clean(raw.split(',').map(str::to_string).collect())
        }
    }
}

/// Parses an exact product-code list. JSON array only.
///
/// Anything else yields an empty list.
///
/// ```rust
/// use coupon_core::codes::parse_code_list;
///
/// assert_eq!(parse_code_list(Some(r#"["SUA1"]"#)), vec!["SUA1"]);
/// assert!(parse_code_list(Some("SUA1,SUA2")).is_empty());
/// ```
pub fn parse_code_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(entries) => clean(entries),
        Err(err) => {
            trace!(%err, "product code list is not a JSON array, ignoring it");
            Vec::new()
        }
    }
}

fn clean(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}
