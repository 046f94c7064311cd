//! # Service Configuration
//!
//! Configuration management for the pricing service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     COUPON_UTC_OFFSET_MINUTES=420                                      │
//! │     COUPON_PRODUCTS_PATH=/srv/data/products.json                       │
//! │     COUPON_CATALOG_PATH=/srv/data/coupons.json                         │
//! │     COUPON_LOG_FILTER=info,coupon=trace                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/coupon-engine/coupon.toml (Linux)                        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     UTC business dates, info,coupon=debug logging                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # coupon.toml
//! [pricing]
//! utc_offset_minutes = 420   # business day follows UTC+07:00
//!
//! [sources]
//! products_path = "data/products.json"
//! catalog_path = "data/coupons.json"
//!
//! [logging]
//! filter = "info,coupon=debug"
//! ```

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::telemetry::DEFAULT_LOG_FILTER;

/// Largest UTC offset any real time zone uses (±14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

// =============================================================================
// Pricing Settings
// =============================================================================

/// How wall-clock time becomes a business date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Store time zone as minutes east of UTC.
    ///
    /// A coupon's date windows are compared with the calendar day in this
    /// zone, not the UTC day.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

// =============================================================================
// Source Settings
// =============================================================================

/// Where the in-memory collaborators load their data from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSettings {
    /// JSON array of product records.
    #[serde(default)]
    pub products_path: Option<PathBuf>,

    /// JSON array of coupons.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log output settings. `RUST_LOG` still wins when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directives.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Service Configuration
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub sources: SourceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ServiceConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (coupon.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading service config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else if explicit {
                return Err(ConfigError::LoadFailed(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load service config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let offset = self.pricing.utc_offset_minutes;
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&offset) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes must be between -{max} and {max}, got {offset}",
                max = MAX_UTC_OFFSET_MINUTES
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging filter must not be empty".into()));
        }

        Ok(())
    }

    /// The store time zone as a chrono offset.
    pub fn utc_offset(&self) -> ConfigResult<FixedOffset> {
        self.pricing
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "utc_offset_minutes out of range: {}",
                    self.pricing.utc_offset_minutes
                ))
            })
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Business day time zone
        if let Some(offset) = lookup("COUPON_UTC_OFFSET_MINUTES") {
            match offset.trim().parse::<i32>() {
                Ok(minutes) => {
                    debug!(minutes, "Overriding UTC offset from environment");
                    self.pricing.utc_offset_minutes = minutes;
                }
                Err(_) => warn!(value = %offset, "Ignoring unparseable COUPON_UTC_OFFSET_MINUTES"),
            }
        }

        // Data sources
        if let Some(path) = lookup("COUPON_PRODUCTS_PATH") {
            debug!(path = %path, "Overriding products path from environment");
            self.sources.products_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("COUPON_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.sources.catalog_path = Some(PathBuf::from(path));
        }

        // Logging
        if let Some(filter) = lookup("COUPON_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "coupon", "coupon-engine")
            .map(|dirs| dirs.config_dir().join("coupon.toml"))
    }
}
