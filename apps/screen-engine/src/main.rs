//! Screen Engine Binary
//!
//! Runs one universe scan and writes the ranked candidates to stdout as
//! JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin screen-engine
//! ```
//!
//! # Environment Variables
//!
//! - `SCREEN_ENGINE_CONFIG`: Path to the YAML config file (default: config.yaml)
//! - `RUST_LOG`: Log level filter, overrides the configured level
//!
//! A missing config file is not an error; the engine runs with defaults
//! against a local delayed-data endpoint.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use screen_engine::config::{self, Config};
use screen_engine::events::NullFlowEventSink;
use screen_engine::models::UniverseScanRequest;
use screen_engine::providers::{
    BrokerageHttpProvider, DelayedHttpProvider, MarketDataProvider, RateLimiter, TieredProvider,
};
use screen_engine::scanner::UniverseScanner;
use screen_engine::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_telemetry(&config.logging);

    tracing::info!("Starting screen engine");

    let delayed = Arc::new(build_delayed(&config)?);
    let market_data = build_market_data(&config, Arc::clone(&delayed)).await;

    let scanner = UniverseScanner::new(
        market_data,
        delayed,
        Arc::new(NullFlowEventSink),
        config.scanner_settings(),
    );

    let request = UniverseScanRequest::default();
    let result = scanner.scan(&request).await.context("universe scan failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("failed to serialize scan result")?
    );
    Ok(())
}

fn load_config() -> anyhow::Result<Config> {
    let path = std::env::var("SCREEN_ENGINE_CONFIG").ok();
    match path.as_deref() {
        Some(path) => config::load_config(Some(path))
            .with_context(|| format!("failed to load config from {path}")),
        None if std::path::Path::new("config.yaml").exists() => {
            config::load_config(None).context("failed to load config.yaml")
        }
        None => Ok(Config::default()),
    }
}

fn build_delayed(config: &Config) -> anyhow::Result<DelayedHttpProvider> {
    let delayed = &config.providers.delayed;
    let limiter = Arc::new(RateLimiter::new(
        delayed.max_requests_per_minute,
        Duration::from_secs(60),
    ));
    DelayedHttpProvider::new(
        delayed.base_url.clone(),
        Duration::from_secs(delayed.request_timeout_secs),
        limiter,
        delayed.retry_policy(),
    )
    .context("failed to build delayed data provider")
}

/// Assemble the tiered market-data provider. The brokerage tier is used
/// only when configured and reachable.
async fn build_market_data(
    config: &Config,
    delayed: Arc<DelayedHttpProvider>,
) -> Arc<dyn MarketDataProvider> {
    let Some(brokerage_config) = &config.providers.brokerage else {
        tracing::info!("no brokerage configured, running delayed-only");
        return Arc::new(TieredProvider::delayed_only(delayed));
    };

    let limiter = Arc::new(RateLimiter::new(
        brokerage_config.max_requests_per_minute,
        Duration::from_secs(60),
    ));
    let brokerage = match BrokerageHttpProvider::new(
        brokerage_config.base_url.clone(),
        brokerage_config.api_key.clone(),
        Duration::from_secs(brokerage_config.request_timeout_secs),
        limiter,
    ) {
        Ok(provider) => provider,
        Err(err) => {
            tracing::warn!(error = %err, "brokerage provider unavailable, running delayed-only");
            return Arc::new(TieredProvider::delayed_only(delayed));
        }
    };

    if brokerage.is_healthy().await {
        tracing::info!(base_url = %brokerage_config.base_url, "brokerage tier active");
        Arc::new(TieredProvider::with_live(Arc::new(brokerage), delayed))
    } else {
        tracing::warn!("brokerage health check failed, running delayed-only");
        Arc::new(TieredProvider::delayed_only(delayed))
    }
}
