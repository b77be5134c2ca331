//! Tier selection: prefer the low-latency tier, degrade to the delayed
//! tier.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{OptionChainSnapshot, TickerOverview};

use super::{MarketDataProvider, ProviderError};

/// Market-data provider that prefers a live tier when one is configured
/// and falls back to the delayed tier on any live-tier failure.
///
/// Call sites are tier-unaware: the returned schema is identical, and the
/// absence or outage of the live tier never fails a request that the
/// delayed tier can serve.
pub struct TieredProvider {
    live: Option<Arc<dyn MarketDataProvider>>,
    delayed: Arc<dyn MarketDataProvider>,
}

impl std::fmt::Debug for TieredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredProvider")
            .field("has_live_tier", &self.live.is_some())
            .finish_non_exhaustive()
    }
}

impl TieredProvider {
    /// Delayed tier only.
    #[must_use]
    pub fn delayed_only(delayed: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            live: None,
            delayed,
        }
    }

    /// Both tiers, live preferred.
    #[must_use]
    pub fn with_live(live: Arc<dyn MarketDataProvider>, delayed: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            live: Some(live),
            delayed,
        }
    }

}

macro_rules! prefer_live {
    ($self:ident, $ticker:ident, $method:ident) => {{
        if let Some(live) = &$self.live {
            match live.$method($ticker).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::warn!(
                        ticker = $ticker,
                        error = %err,
                        "live tier failed, degrading to delayed tier"
                    );
                }
            }
        }
        $self.delayed.$method($ticker).await
    }};
}

#[async_trait]
impl MarketDataProvider for TieredProvider {
    async fn overview(&self, ticker: &str) -> Result<TickerOverview, ProviderError> {
        prefer_live!(self, ticker, overview)
    }

    async fn option_chain(&self, ticker: &str) -> Result<OptionChainSnapshot, ProviderError> {
        prefer_live!(self, ticker, option_chain)
    }

    async fn iv_history(&self, ticker: &str) -> Result<Vec<f64>, ProviderError> {
        prefer_live!(self, ticker, iv_history)
    }

    async fn daily_closes(&self, ticker: &str) -> Result<Vec<f64>, ProviderError> {
        prefer_live!(self, ticker, daily_closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockMarketData;

    #[tokio::test]
    async fn prefers_live_tier() {
        let live = Arc::new(MockMarketData::new());
        live.set_iv_history("AAPL", vec![0.9]);
        let delayed = Arc::new(MockMarketData::new());
        delayed.set_iv_history("AAPL", vec![0.1]);

        let tiered = TieredProvider::with_live(live, delayed);
        assert_eq!(tiered.iv_history("AAPL").await.unwrap(), vec![0.9]);
    }

    #[tokio::test]
    async fn degrades_when_live_tier_fails() {
        let live = Arc::new(MockMarketData::new());
        live.fail_ticker("AAPL");
        let delayed = Arc::new(MockMarketData::new());
        delayed.set_iv_history("AAPL", vec![0.1]);

        let tiered = TieredProvider::with_live(live, delayed);
        assert_eq!(tiered.iv_history("AAPL").await.unwrap(), vec![0.1]);
    }

    #[tokio::test]
    async fn delayed_only_serves_directly() {
        let delayed = Arc::new(MockMarketData::new());
        delayed.set_iv_history("AAPL", vec![0.5]);

        let tiered = TieredProvider::delayed_only(delayed);
        assert_eq!(tiered.iv_history("AAPL").await.unwrap(), vec![0.5]);
    }
}
