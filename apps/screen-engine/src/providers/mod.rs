//! Provider boundary: market data and research ports with their adapters.
//!
//! Two market-data tiers exist behind one trait — a delayed free tier and
//! an optional low-latency brokerage tier — selected at runtime by
//! [`TieredProvider`]. Call sites never learn which tier served them; the
//! schema is identical, only freshness differs.

mod brokerage;
mod delayed;
pub mod mock;
mod rate_limit;
mod retry;
mod tiered;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Fundamentals, InsiderActivity, NewsItem, OptionChainSnapshot, TickerOverview};

pub use brokerage::BrokerageHttpProvider;
pub use delayed::DelayedHttpProvider;
pub use rate_limit::RateLimiter;
pub use retry::{ExponentialBackoff, RetryPolicy, is_retryable_status, parse_retry_after};
pub use tiered::TieredProvider;

/// Failures at the provider boundary.
///
/// These never cross the scanner's public surface: the per-ticker worker
/// catches them and records the ticker as excluded.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Non-success HTTP status from the provider.
    #[error("provider returned HTTP {status}: {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Transport-level failure (DNS, connect, TLS, read).
    #[error("provider network error: {message}")]
    Network {
        /// Underlying error text.
        message: String,
    },

    /// The request did not complete within its timeout.
    #[error("provider request timed out")]
    Timeout,

    /// The response arrived but could not be decoded.
    #[error("malformed provider payload: {message}")]
    MalformedPayload {
        /// Decode error text.
        message: String,
    },
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => is_retryable_status(*status),
            Self::Network { .. } | Self::Timeout => true,
            Self::MalformedPayload { .. } => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedPayload {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }
}

/// Port for quote/chain market data.
///
/// Implementations must return the same schema regardless of tier.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Cheap per-ticker summary for the phase-1 filter.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the overview cannot be fetched.
    async fn overview(&self, ticker: &str) -> Result<TickerOverview, ProviderError>;

    /// Full option chain snapshot across near-term expirations.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the chain cannot be fetched.
    async fn option_chain(&self, ticker: &str) -> Result<OptionChainSnapshot, ProviderError>;

    /// Historical ATM implied volatility series, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the history cannot be fetched.
    async fn iv_history(&self, ticker: &str) -> Result<Vec<f64>, ProviderError>;

    /// Daily close series, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the series cannot be fetched.
    async fn daily_closes(&self, ticker: &str) -> Result<Vec<f64>, ProviderError>;
}

/// Port for the auxiliary fundamentals/news/insider inputs.
///
/// Failures here degrade the candidate to neutral values; they never
/// exclude it.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Fundamental quality inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when fundamentals cannot be fetched.
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, ProviderError>;

    /// Recent headlines, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when news cannot be fetched.
    async fn recent_news(&self, ticker: &str) -> Result<Vec<NewsItem>, ProviderError>;

    /// 90-day insider transaction counts.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when insider data cannot be fetched.
    async fn insider_activity(&self, ticker: &str) -> Result<InsiderActivity, ProviderError>;
}
