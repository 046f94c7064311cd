//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,coupon=debug";

/// Builds the filter: `RUST_LOG` when set and valid, else `fallback`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=coupon=trace` - Show trace for coupon crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// Calling this twice is harmless: the second call does nothing.
pub fn init_tracing(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_writer(std::io::stderr)
        .try_init();
}
