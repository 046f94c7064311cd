//! # Service Error Types
//!
//! Error types for request handling, collaborators and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Service Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌──────────────────────┐  ┌──────────────────┐   │
//! │  │  UpstreamError  │  │     ServiceError     │  │   ConfigError    │   │
//! │  │  (collaborator) │─►│                      │◄─│                  │   │
//! │  │                 │  │  UpstreamUnavailable │  │  LoadFailed      │   │
//! │  │  Connection     │  │  InvalidRequest      │  │  Invalid         │   │
//! │  │  Timeout        │  │  Config              │  │                  │   │
//! │  │  Unauthorized   │  │                      │  │                  │   │
//! │  │  InvalidData    │  │                      │  │                  │   │
//! │  └─────────────────┘  └──────────────────────┘  └──────────────────┘   │
//! │                                                                         │
//! │  The engine itself never fails: malformed coupons are skipped inside    │
//! │  coupon-core. Only collaborators and setup can produce these errors.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Upstream Error
// =============================================================================

/// Result type alias for collaborator calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Why a collaborator (product directory, coupon catalog) could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The source could not be reached or read.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The source did not answer in time.
    #[error("timed out after {0} seconds")]
    Timeout(u64),

    /// The request credential was missing or rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The source answered with data that could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl UpstreamError {
    /// Returns true if a later attempt could succeed.
    ///
    /// The service never retries by itself. This is for callers that do.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::ConnectionFailed(_) | UpstreamError::Timeout(_)
        )
    }
}

impl From<std::io::Error> for UpstreamError {
    fn from(err: std::io::Error) -> Self {
        UpstreamError::ConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::InvalidData(err.to_string())
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration could not be loaded or is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// A setting is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

// =============================================================================
// Service Error
// =============================================================================

/// Result type alias for pricing requests.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The collaborator a request depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collaborator {
    ProductDirectory,
    CouponCatalog,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::ProductDirectory => write!(f, "product directory"),
            Collaborator::CouponCatalog => write!(f, "coupon catalog"),
        }
    }
}

/// A pricing request failed as a whole.
///
/// Callers receive either a complete result or one of these, never a
/// partially discounted cart.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A collaborator could not be reached. Nothing was priced.
    #[error("{collaborator} unavailable: {reason}")]
    UpstreamUnavailable {
        collaborator: Collaborator,
        #[source]
        reason: UpstreamError,
    },

    /// The request itself is unusable.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Setup failed before any request could be served.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ServiceError {
    /// Wraps a collaborator failure.
    pub fn upstream(collaborator: Collaborator, reason: UpstreamError) -> Self {
        ServiceError::UpstreamUnavailable {
            collaborator,
            reason,
        }
    }

    /// Returns true if a collaborator caused the failure.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ServiceError::UpstreamUnavailable { .. })
    }

    /// Returns true if repeating the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::UpstreamUnavailable { reason, .. } => reason.is_retryable(),
            ServiceError::InvalidRequest(_) | ServiceError::Config(_) => false,
        }
    }

    /// Machine-readable code for error reports.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::UpstreamUnavailable { .. } => ErrorCode::UpstreamUnavailable,
            ServiceError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            ServiceError::Config(_) => ErrorCode::ConfigError,
        }
    }
}

// =============================================================================
// Error Report
// =============================================================================

/// Error codes for reports printed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A collaborator could not answer
    UpstreamUnavailable,

    /// The request could not be understood
    InvalidRequest,

    /// Configuration could not be loaded
    ConfigError,

    /// A coupon definition failed validation
    ValidationError,
}

impl ErrorCode {
    /// The code as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable error report.
///
/// ```json
/// {
///   "code": "UPSTREAM_UNAVAILABLE",
///   "message": "coupon catalog unavailable: timed out after 5 seconds"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

impl ErrorReport {
    /// Creates a new report.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorReport {
            code,
            message: message.into(),
        }
    }
}

impl From<&ServiceError> for ErrorReport {
    fn from(err: &ServiceError) -> Self {
        ErrorReport::new(err.code(), err.to_string())
    }
}

impl From<&coupon_core::ValidationError> for ErrorReport {
    fn from(err: &coupon_core::ValidationError) -> Self {
        ErrorReport::new(ErrorCode::ValidationError, err.to_string())
    }
}
