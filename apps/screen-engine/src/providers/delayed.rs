//! Delayed free-tier HTTP provider.
//!
//! No SLA, typical lag 15-60 minutes. Serves both the market-data and
//! research ports from one JSON API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::models::{Fundamentals, InsiderActivity, NewsItem, OptionChainSnapshot, TickerOverview};

use super::rate_limit::RateLimiter;
use super::retry::{ExponentialBackoff, RetryPolicy, parse_retry_after};
use super::{MarketDataProvider, ProviderError, ResearchProvider};

/// A failed request plus the server's pacing hint, if any.
struct RequestFailure {
    error: ProviderError,
    retry_after: Option<Duration>,
}

impl From<ProviderError> for RequestFailure {
    fn from(error: ProviderError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::from(err).into()
    }
}

/// HTTP adapter for the delayed data tier.
#[derive(Debug)]
pub struct DelayedHttpProvider {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl DelayedHttpProvider {
    /// Build an adapter against `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Network`] when the HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        rate_limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
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
            rate_limiter,
            retry,
        })
    }

    /// GET a JSON resource with pacing and retry on transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let url = format!("{}/{path}", self.base_url);
        let mut backoff = ExponentialBackoff::new(&self.retry);

        loop {
            self.rate_limiter.acquire().await;

            match self.try_get(&url).await {
                Ok(value) => return Ok(value),
                Err(failure) if failure.error.is_retryable() => match backoff.next_backoff() {
                    Some(delay) => {
                        // A Retry-After hint overrides the computed backoff,
                        // capped at the policy ceiling.
                        let delay = failure
                            .retry_after
                            .unwrap_or(delay)
                            .min(self.retry.max_backoff);
                        tracing::warn!(
                            url,
                            error = %failure.error,
                            attempt = backoff.current_attempt(),
                            "retrying provider request"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(failure.error),
                },
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, RequestFailure> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let message = response.text().await.unwrap_or_default();
            return Err(RequestFailure {
                error: ProviderError::Http {
                    status: status.as_u16(),
                    message,
                },
                retry_after,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RequestFailure::from(ProviderError::MalformedPayload {
                message: e.to_string(),
            }))
    }
}

#[async_trait]
impl MarketDataProvider for DelayedHttpProvider {
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

#[async_trait]
impl ResearchProvider for DelayedHttpProvider {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, ProviderError> {
        self.get_json(&format!("v1/fundamentals/{ticker}")).await
    }

    async fn recent_news(&self, ticker: &str) -> Result<Vec<NewsItem>, ProviderError> {
        self.get_json(&format!("v1/news/{ticker}")).await
    }

    async fn insider_activity(&self, ticker: &str) -> Result<InsiderActivity, ProviderError> {
        self.get_json(&format!("v1/insiders/{ticker}")).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> DelayedHttpProvider {
        DelayedHttpProvider::new(
            base_url,
            Duration::from_secs(2),
            Arc::new(RateLimiter::unlimited()),
            RetryPolicy {
                initial_backoff: Duration::from_millis(10),
                max_backoff: Duration::from_millis(50),
                jitter_factor: 0.0,
                ..RetryPolicy::default()
            },
        )
        .unwrap()
    }

    fn overview_body() -> serde_json::Value {
        json!({
            "ticker": "AAPL",
            "company_name": "Apple Inc.",
            "sector": "Technology",
            "price": "189.50",
            "market_cap": 2.9e12,
            "average_volume": 55_000_000u64,
            "analyst_coverage": 42,
            "has_listed_options": true
        })
    }

    #[tokio::test]
    async fn fetches_overview() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/overview/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let overview = provider.overview("AAPL").await.unwrap();

        assert_eq!(overview.ticker, "AAPL");
        assert_eq!(overview.analyst_coverage, 42);
        assert!(overview.has_listed_options);
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/iv-history/AAPL"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/iv-history/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([0.2, 0.3, 0.4])))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let history = provider.iv_history("AAPL").await.unwrap();
        assert_eq!(history, vec![0.2, 0.3, 0.4]);
    }

    #[tokio::test]
    async fn honors_retry_after_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/overview/AAPL"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/overview/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let overview = provider.overview("AAPL").await.unwrap();
        assert_eq!(overview.ticker, "AAPL");
    }

    #[tokio::test]
    async fn client_errors_fail_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/closes/ZZZZ"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let err = provider.daily_closes("ZZZZ").await.unwrap_err();
        assert!(matches!(err, ProviderError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn malformed_payload_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/fundamentals/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = provider(&server.uri());
        let err = provider.fundamentals("AAPL").await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedPayload { .. }));
    }
}
