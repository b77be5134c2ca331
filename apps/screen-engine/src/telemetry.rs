//! Tracing setup.
//!
//! Console-only structured logging. `RUST_LOG` overrides the configured
//! level filter when set.
//!
//! # Usage
//!
//! ```rust,ignore
//! use screen_engine::config::LoggingConfig;
//! use screen_engine::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_telemetry(&LoggingConfig::default());
//!     // ... application code
//! }
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize console tracing.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_telemetry(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    if config.format == "pretty" {
        builder.with_ansi(true).init();
    } else {
        builder.with_ansi(false).json().init();
    }

    tracing::info!(level = %config.level, format = %config.format, "tracing initialized");
}
