//! In-memory providers for testing.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Fundamentals, InsiderActivity, NewsItem, OptionChainSnapshot, TickerOverview};

use super::{MarketDataProvider, ProviderError, ResearchProvider};

fn not_found(ticker: &str) -> ProviderError {
    ProviderError::Http {
        status: 404,
        message: format!("no data for {ticker}"),
    }
}

fn injected_failure(ticker: &str) -> ProviderError {
    ProviderError::Network {
        message: format!("injected failure for {ticker}"),
    }
}

/// Mock market-data provider backed by in-memory maps.
#[derive(Debug, Default)]
pub struct MockMarketData {
    overviews: RwLock<HashMap<String, TickerOverview>>,
    chains: RwLock<HashMap<String, OptionChainSnapshot>>,
    iv_histories: RwLock<HashMap<String, Vec<f64>>>,
    daily_closes: RwLock<HashMap<String, Vec<f64>>>,
    failing: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
}

impl MockMarketData {
    /// Empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the overview for a ticker.
    pub fn set_overview(&self, overview: TickerOverview) {
        self.overviews
            .write()
            .unwrap()
            .insert(overview.ticker.clone(), overview);
    }

    /// Seed the option chain for a ticker. The snapshot timestamp is
    /// pinned so repeated scans see identical data.
    pub fn set_chain(&self, chain: OptionChainSnapshot) {
        self.chains
            .write()
            .unwrap()
            .insert(chain.ticker.clone(), chain);
    }

    /// Seed the IV history for a ticker.
    pub fn set_iv_history(&self, ticker: &str, history: Vec<f64>) {
        self.iv_histories
            .write()
            .unwrap()
            .insert(ticker.to_string(), history);
    }

    /// Seed the daily close series for a ticker.
    pub fn set_daily_closes(&self, ticker: &str, closes: Vec<f64>) {
        self.daily_closes
            .write()
            .unwrap()
            .insert(ticker.to_string(), closes);
    }

    /// Every call for this ticker fails with a network error.
    pub fn fail_ticker(&self, ticker: &str) {
        self.failing.write().unwrap().insert(ticker.to_string());
    }

    /// Every call for this ticker sleeps first, for timeout tests.
    pub fn set_delay(&self, ticker: &str, delay: Duration) {
        self.delays
            .write()
            .unwrap()
            .insert(ticker.to_string(), delay);
    }

    async fn gate(&self, ticker: &str) -> Result<(), ProviderError> {
        let delay = self.delays.read().unwrap().get(ticker).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().unwrap().contains(ticker) {
            return Err(injected_failure(ticker));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    async fn overview(&self, ticker: &str) -> Result<TickerOverview, ProviderError> {
        self.gate(ticker).await?;
        self.overviews
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .ok_or_else(|| not_found(ticker))
    }

    async fn option_chain(&self, ticker: &str) -> Result<OptionChainSnapshot, ProviderError> {
        self.gate(ticker).await?;
        self.chains
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .ok_or_else(|| not_found(ticker))
    }

    async fn iv_history(&self, ticker: &str) -> Result<Vec<f64>, ProviderError> {
        self.gate(ticker).await?;
        Ok(self
            .iv_histories
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }

    async fn daily_closes(&self, ticker: &str) -> Result<Vec<f64>, ProviderError> {
        self.gate(ticker).await?;
        Ok(self
            .daily_closes
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock research provider. Unseeded tickers read as neutral, mirroring
/// the degrade-to-neutral contract of the real adapters.
#[derive(Debug, Default)]
pub struct MockResearch {
    fundamentals: RwLock<HashMap<String, Fundamentals>>,
    news: RwLock<HashMap<String, Vec<NewsItem>>>,
    insiders: RwLock<HashMap<String, InsiderActivity>>,
    failing: RwLock<HashSet<String>>,
}

impl MockResearch {
    /// Empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed fundamentals for a ticker.
    pub fn set_fundamentals(&self, ticker: &str, fundamentals: Fundamentals) {
        self.fundamentals
            .write()
            .unwrap()
            .insert(ticker.to_string(), fundamentals);
    }

    /// Seed headlines for a ticker.
    pub fn set_news(&self, ticker: &str, news: Vec<NewsItem>) {
        self.news.write().unwrap().insert(ticker.to_string(), news);
    }

    /// Seed insider activity for a ticker.
    pub fn set_insiders(&self, ticker: &str, activity: InsiderActivity) {
        self.insiders
            .write()
            .unwrap()
            .insert(ticker.to_string(), activity);
    }

    /// Every call for this ticker fails with a network error.
    pub fn fail_ticker(&self, ticker: &str) {
        self.failing.write().unwrap().insert(ticker.to_string());
    }

    fn gate(&self, ticker: &str) -> Result<(), ProviderError> {
        if self.failing.read().unwrap().contains(ticker) {
            return Err(injected_failure(ticker));
        }
        Ok(())
    }
}

#[async_trait]
impl ResearchProvider for MockResearch {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, ProviderError> {
        self.gate(ticker)?;
        Ok(self
            .fundamentals
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }

    async fn recent_news(&self, ticker: &str) -> Result<Vec<NewsItem>, ProviderError> {
        self.gate(ticker)?;
        Ok(self
            .news
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }

    async fn insider_activity(&self, ticker: &str) -> Result<InsiderActivity, ProviderError> {
        self.gate(ticker)?;
        Ok(self
            .insiders
            .read()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }
}

/// A fixed timestamp for reproducible snapshots in tests.
#[must_use]
pub fn fixed_as_of() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-21T15:30:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}
