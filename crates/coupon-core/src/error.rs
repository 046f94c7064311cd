//! # Error Types
//!
//! Domain-specific error types for coupon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  coupon-core errors (this file)                                        │
//! │  ├── RuleError        - Why ONE coupon could not be evaluated          │
//! │  └── ValidationError  - Why a coupon definition is rejected            │
//! │                                                                         │
//! │  coupon-service errors (separate crate)                                │
//! │  └── ServiceError     - Upstream unavailable, bad config, ...          │
//! │                                                                         │
//! │  RuleError never leaves the engine: the coupon is skipped, a warning   │
//! │  is logged, and every other coupon is still evaluated.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Rule Error
// =============================================================================

/// A structured reason why a single coupon was excluded from evaluation.
///
/// ## When This Occurs
/// ```text
/// Catalog snapshot (20 coupons)
///      │
///      ▼
/// Coupon #7: requiredProductCodes = "[SUA("   ← unbalanced regex group
///      │
///      ▼
/// RuleError::InvalidPattern { pattern: "[SUA(", .. }
///      │
///      ▼
/// warn!(coupon_id = 7, ...)  → coupon #7 skipped, 19 others evaluated
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A wildcard pattern did not translate into a valid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A field the coupon's category needs is absent.
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// Discount arithmetic left the representable decimal range.
    #[error("discount arithmetic overflowed")]
    ArithmeticOverflow,
}

impl RuleError {
    /// Creates a MissingField error.
    pub fn missing(field: &'static str) -> Self {
        RuleError::MissingField { field }
    }
}

/// Result of evaluating one coupon.
pub type RuleResult<T> = Result<T, RuleError>;

// =============================================================================
// Validation Error
// =============================================================================

/// Coupon definition validation errors.
///
/// These occur when a coupon definition does not meet requirements.
/// Used before a definition is accepted into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., a pattern that does not compile).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A date window ends before it starts.
    #[error("{field} ends before it starts")]
    InvertedWindow { field: String },
}

impl From<RuleError> for ValidationError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::InvalidPattern { pattern, reason } => ValidationError::InvalidFormat {
                field: "pattern".to_string(),
                reason: format!("'{pattern}': {reason}"),
            },
            RuleError::MissingField { field } => ValidationError::Required {
                field: field.to_string(),
            },
            RuleError::ArithmeticOverflow => ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: 0,
                max: i64::MAX,
            },
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_messages() {
        let err = RuleError::InvalidPattern {
            pattern: "[SUA".to_string(),
            reason: "unclosed character class".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid pattern '[SUA': unclosed character class"
        );

        assert_eq!(
            RuleError::missing("fixedAmount").to_string(),
            "missing required field 'fixedAmount'"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvertedWindow {
            field: "validity".to_string(),
        };
        assert_eq!(err.to_string(), "validity ends before it starts");
    }

    #[test]
    fn test_rule_error_converts_to_validation_error() {
        let validation: ValidationError = RuleError::missing("fixedAmount").into();
        assert!(matches!(validation, ValidationError::Required { .. }));

        let validation: ValidationError = RuleError::InvalidPattern {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        }
        .into();
        assert!(matches!(validation, ValidationError::InvalidFormat { .. }));
    }
}
