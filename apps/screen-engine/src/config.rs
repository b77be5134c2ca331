//! Configuration loading and validation.
//!
//! All tunables in the detection pipeline come through here: every
//! threshold has a default matching the shipped behavior, so an empty
//! config file yields a working engine. Validation runs at load time; a
//! misconfigured file never reaches the scanner.
//!
//! # Usage
//!
//! ```rust,ignore
//! use screen_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discovery::StructuralThresholds;
use crate::flow::FlowThresholds;
use crate::providers::RetryPolicy;
use crate::scanner::{QuickFilterSettings, ScannerSettings};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scanner pool and timeout configuration.
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// Phase-1 quick filter bounds.
    #[serde(default)]
    pub quick_filter: QuickFilterConfig,
    /// Unusual-activity thresholds.
    #[serde(default)]
    pub flow: FlowConfig,
    /// Structural signal thresholds.
    #[serde(default)]
    pub structural: StructuralConfig,
    /// Pricing parameters.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Market data and research provider configuration.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Assemble runtime scanner settings from the threshold sections.
    #[must_use]
    pub fn scanner_settings(&self) -> ScannerSettings {
        ScannerSettings {
            max_concurrency: self.scanner.max_concurrency,
            ticker_timeout: Duration::from_secs(self.scanner.ticker_timeout_secs),
            scan_deadline: Duration::from_secs(self.scanner.scan_deadline_secs),
            quick_filter: QuickFilterSettings {
                min_price: self.quick_filter.min_price,
                max_price: self.quick_filter.max_price,
                min_average_volume: self.quick_filter.min_average_volume,
            },
            flow: FlowThresholds {
                vol_oi_threshold: self.flow.vol_oi_threshold,
                premium_threshold: self.flow.premium_threshold,
            },
            structural: StructuralThresholds {
                unusual_volume_ratio: self.structural.unusual_volume_ratio,
                iv_surge_percentile: self.structural.iv_surge_percentile,
                oi_concentration: self.structural.oi_concentration,
                pcr_low: self.structural.pcr_low,
                pcr_high: self.structural.pcr_high,
            },
            hv_window: self.pricing.hv_window_days as usize,
        }
    }
}

/// Scanner pool and timeout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Maximum concurrent per-ticker workers.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Per-ticker pipeline timeout in seconds.
    #[serde(default = "default_ticker_timeout")]
    pub ticker_timeout_secs: u64,
    /// Wall-clock budget for a whole scan in seconds.
    #[serde(default = "default_scan_deadline")]
    pub scan_deadline_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            ticker_timeout_secs: default_ticker_timeout(),
            scan_deadline_secs: default_scan_deadline(),
        }
    }
}

const fn default_max_concurrency() -> usize {
    10
}
const fn default_ticker_timeout() -> u64 {
    10
}
const fn default_scan_deadline() -> u64 {
    120
}

/// Phase-1 quick filter bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickFilterConfig {
    /// Minimum stock price in dollars.
    #[serde(default = "default_min_price")]
    pub min_price: f64,
    /// Maximum stock price in dollars.
    #[serde(default = "default_max_price")]
    pub max_price: f64,
    /// Minimum average daily share volume.
    #[serde(default = "default_min_average_volume")]
    pub min_average_volume: u64,
}

impl Default for QuickFilterConfig {
    fn default() -> Self {
        Self {
            min_price: default_min_price(),
            max_price: default_max_price(),
            min_average_volume: default_min_average_volume(),
        }
    }
}

const fn default_min_price() -> f64 {
    5.0
}
const fn default_max_price() -> f64 {
    500.0
}
const fn default_min_average_volume() -> u64 {
    100_000
}

/// Unusual-activity thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Volume-to-open-interest ratio above which a contract is unusual.
    #[serde(default = "default_vol_oi_threshold")]
    pub vol_oi_threshold: f64,
    /// Dollar premium flow above which a contract is unusual.
    #[serde(default = "default_premium_threshold")]
    pub premium_threshold: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            vol_oi_threshold: default_vol_oi_threshold(),
            premium_threshold: default_premium_threshold(),
        }
    }
}

const fn default_vol_oi_threshold() -> f64 {
    2.0
}
const fn default_premium_threshold() -> f64 {
    500_000.0
}

/// Structural signal thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralConfig {
    /// Chain volume / open interest ratio that fires the unusual-volume
    /// check.
    #[serde(default = "default_unusual_volume_ratio")]
    pub unusual_volume_ratio: f64,
    /// IV percentile that fires the IV-surge check.
    #[serde(default = "default_iv_surge_percentile")]
    pub iv_surge_percentile: f64,
    /// Total open interest that fires the concentration check.
    #[serde(default = "default_oi_concentration")]
    pub oi_concentration: u64,
    /// Put/call ratio below which sentiment reads extremely bullish.
    #[serde(default = "default_pcr_low")]
    pub pcr_low: f64,
    /// Put/call ratio above which sentiment reads extremely bearish.
    #[serde(default = "default_pcr_high")]
    pub pcr_high: f64,
}

impl Default for StructuralConfig {
    fn default() -> Self {
        Self {
            unusual_volume_ratio: default_unusual_volume_ratio(),
            iv_surge_percentile: default_iv_surge_percentile(),
            oi_concentration: default_oi_concentration(),
            pcr_low: default_pcr_low(),
            pcr_high: default_pcr_high(),
        }
    }
}

const fn default_unusual_volume_ratio() -> f64 {
    0.5
}
const fn default_iv_surge_percentile() -> f64 {
    70.0
}
const fn default_oi_concentration() -> u64 {
    10_000
}
const fn default_pcr_low() -> f64 {
    0.3
}
const fn default_pcr_high() -> f64 {
    3.0
}

/// Pricing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Historical volatility window in trading days.
    #[serde(default = "default_hv_window")]
    pub hv_window_days: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            hv_window_days: default_hv_window(),
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.05
}
const fn default_hv_window() -> u32 {
    30
}

/// Provider configuration: the delayed tier is always present, the live
/// brokerage tier is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Delayed-data provider (always configured).
    #[serde(default)]
    pub delayed: DelayedProviderConfig,
    /// Live brokerage provider; omitted means delayed-only operation.
    #[serde(default)]
    pub brokerage: Option<BrokerageProviderConfig>,
}

/// Delayed-data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayedProviderConfig {
    /// Base URL for API calls.
    #[serde(default = "default_delayed_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_delayed_timeout")]
    pub request_timeout_secs: u64,
    /// Sliding-window request budget per minute.
    #[serde(default = "default_delayed_rate_limit")]
    pub max_requests_per_minute: usize,
    /// Retry attempts for retryable failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_max_attempts: u32,
    /// Initial retry backoff in milliseconds.
    #[serde(default = "default_retry_initial_backoff")]
    pub retry_initial_backoff_ms: u64,
    /// Retry backoff ceiling in milliseconds.
    #[serde(default = "default_retry_max_backoff")]
    pub retry_max_backoff_ms: u64,
}

impl Default for DelayedProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_delayed_base_url(),
            request_timeout_secs: default_delayed_timeout(),
            max_requests_per_minute: default_delayed_rate_limit(),
            retry_max_attempts: default_retry_attempts(),
            retry_initial_backoff_ms: default_retry_initial_backoff(),
            retry_max_backoff_ms: default_retry_max_backoff(),
        }
    }
}

impl DelayedProviderConfig {
    /// Assemble the retry policy for this provider.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            initial_backoff: Duration::from_millis(self.retry_initial_backoff_ms),
            max_backoff: Duration::from_millis(self.retry_max_backoff_ms),
            ..RetryPolicy::default()
        }
    }
}

fn default_delayed_base_url() -> String {
    "http://localhost:8080".to_string()
}
const fn default_delayed_timeout() -> u64 {
    30
}
const fn default_delayed_rate_limit() -> usize {
    60
}
const fn default_retry_attempts() -> u32 {
    3
}
const fn default_retry_initial_backoff() -> u64 {
    200
}
const fn default_retry_max_backoff() -> u64 {
    5000
}

/// Live brokerage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerageProviderConfig {
    /// Base URL for API calls.
    pub base_url: String,
    /// API key sent with every request.
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_brokerage_timeout")]
    pub request_timeout_secs: u64,
    /// Sliding-window request budget per minute.
    #[serde(default = "default_brokerage_rate_limit")]
    pub max_requests_per_minute: usize,
}

const fn default_brokerage_timeout() -> u64 {
    10
}
const fn default_brokerage_rate_limit() -> usize {
    120
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty".
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or
/// validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml_bw::from_str(yaml)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.scanner.max_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "scanner.max_concurrency must be at least 1".to_string(),
        ));
    }

    if config.scanner.ticker_timeout_secs >= config.scanner.scan_deadline_secs {
        return Err(ConfigError::ValidationError(
            "scanner.ticker_timeout_secs must be shorter than scan_deadline_secs".to_string(),
        ));
    }

    if config.quick_filter.min_price <= 0.0
        || config.quick_filter.min_price >= config.quick_filter.max_price
    {
        return Err(ConfigError::ValidationError(
            "quick_filter.min_price must be positive and below max_price".to_string(),
        ));
    }

    if config.flow.vol_oi_threshold <= 0.0 || config.flow.premium_threshold <= 0.0 {
        return Err(ConfigError::ValidationError(
            "flow thresholds must be positive".to_string(),
        ));
    }

    if !(0.0..=100.0).contains(&config.structural.iv_surge_percentile) {
        return Err(ConfigError::ValidationError(
            "structural.iv_surge_percentile must be between 0 and 100".to_string(),
        ));
    }

    if config.structural.pcr_low <= 0.0 || config.structural.pcr_low >= config.structural.pcr_high {
        return Err(ConfigError::ValidationError(
            "structural.pcr_low must be positive and below pcr_high".to_string(),
        ));
    }

    if config.pricing.risk_free_rate < 0.0 || config.pricing.risk_free_rate > 1.0 {
        return Err(ConfigError::ValidationError(
            "pricing.risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if let Some(brokerage) = &config.providers.brokerage {
        if brokerage.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.brokerage.base_url must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
