//! Low-latency brokerage-tier HTTP provider.
//!
//! Same schema as the delayed tier; only freshness differs. Requires an
//! API key and exposes a health probe so the tiered provider can decide
//! whether this tier is reachable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::models::{OptionChainSnapshot, TickerOverview};

use super::rate_limit::RateLimiter;
use super::{MarketDataProvider, ProviderError};

/// Header carrying the brokerage API key.
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP adapter for the brokerage data tier.
#[derive(Debug)]
pub struct BrokerageHttpProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter>,
}

impl BrokerageHttpProvider {
    /// Build an adapter against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Network`] when the HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
        rate_limiter: Arc<RateLimiter>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProviderError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Probe the tier. A failed probe means the scan degrades to the
    /// delayed tier; it is never an error.
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/v1/health", self.base_url);
        match self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::MalformedPayload {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl MarketDataProvider for BrokerageHttpProvider {
    async fn overview(&self, ticker: &str) -> Result<TickerOverview, ProviderError> {
        self.get_json(&format!("v1/overview/{ticker}")).await
    }

    async fn option_chain(&self, ticker: &str) -> Result<OptionChainSnapshot, ProviderError> {
        self.get_json(&format!("v1/chains/{ticker}")).await
    }

    async fn iv_history(&self, ticker: &str) -> Result<Vec<f64>, ProviderError> {
        self.get_json(&format!("v1/iv-history/{ticker}")).await
    }

    async fn daily_closes(&self, ticker: &str) -> Result<Vec<f64>, ProviderError> {
        self.get_json(&format!("v1/closes/{ticker}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> BrokerageHttpProvider {
        BrokerageHttpProvider::new(
            base_url,
            "test-key",
            Duration::from_secs(2),
            Arc::new(RateLimiter::unlimited()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/iv-history/MSFT"))
            .and(header(API_KEY_HEADER, "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.25])))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        assert_eq!(provider.iv_history("MSFT").await.unwrap(), vec![0.25]);
    }

    #[tokio::test]
    async fn health_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        assert!(provider.is_healthy().await);

        let unreachable = BrokerageHttpProvider::new(
            "http://127.0.0.1:9",
            "test-key",
            Duration::from_millis(200),
            Arc::new(RateLimiter::unlimited()),
        )
        .unwrap();
        assert!(!unreachable.is_healthy().await);
    }
}
