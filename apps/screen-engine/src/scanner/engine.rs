//! Two-phase universe scan over a bounded worker pool.
//!
//! Phase 1 runs a cheap overview filter across the whole universe; phase 2
//! runs the full signal battery plus auxiliary scoring on the survivors.
//! Worker failures and timeouts become exclusions, never batch aborts; the
//! only error this module raises is request misconfiguration, before any
//! worker is dispatched.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout};

use crate::discovery::{
    StructuralThresholds, analyst_coverage_bonus, analyze_news, detect_structural_signals,
    discovery_reasons, discovery_score, insider_sentiment, iv_hv_interpretation, iv_hv_ratio,
    market_cap_bonus, quality_score,
};
use crate::error::ScanError;
use crate::events::{FlowEvent, FlowEventSink};
use crate::flow::{FlowThresholds, detect_unusual_activity, generate_wheel_signals};
use crate::models::{
    GemCandidate, TickerOverview, UniverseScanRequest, UniverseScanResult,
};
use crate::pricing::{atm_iv, historical_volatility, iv_percentile};
use crate::providers::{MarketDataProvider, ResearchProvider};

use super::universe;

/// Phase-1 overview filter bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickFilterSettings {
    /// Minimum stock price.
    pub min_price: f64,
    /// Maximum stock price.
    pub max_price: f64,
    /// Minimum average daily share volume.
    pub min_average_volume: u64,
}

impl Default for QuickFilterSettings {
    fn default() -> Self {
        Self {
            min_price: 5.0,
            max_price: 500.0,
            min_average_volume: 100_000,
        }
    }
}

impl QuickFilterSettings {
    fn passes(&self, overview: &TickerOverview) -> bool {
        let price = overview.price_f64();
        price >= self.min_price
            && price <= self.max_price
            && overview.average_volume >= self.min_average_volume
            && overview.has_listed_options
    }
}

/// Scanner tuning: pool size, timeouts, and detection thresholds.
#[derive(Debug, Clone)]
pub struct ScannerSettings {
    /// Concurrent worker bound.
    pub max_concurrency: usize,
    /// Per-ticker pipeline timeout. Must be shorter than the scan
    /// deadline.
    pub ticker_timeout: Duration,
    /// Wall-clock budget for the whole scan.
    pub scan_deadline: Duration,
    /// Phase-1 filter bounds.
    pub quick_filter: QuickFilterSettings,
    /// Unusual-activity thresholds.
    pub flow: FlowThresholds,
    /// Structural signal thresholds.
    pub structural: StructuralThresholds,
    /// Historical-volatility window in trading days.
    pub hv_window: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            ticker_timeout: Duration::from_secs(10),
            scan_deadline: Duration::from_secs(120),
            quick_filter: QuickFilterSettings::default(),
            flow: FlowThresholds::default(),
            structural: StructuralThresholds::default(),
            hv_window: 30,
        }
    }
}

/// The universe scanner.
///
/// Validated requests always produce a result object; provider failures
/// surface only as exclusions in the scan metadata.
pub struct UniverseScanner {
    market_data: Arc<dyn MarketDataProvider>,
    research: Arc<dyn ResearchProvider>,
    events: Arc<dyn FlowEventSink>,
    settings: ScannerSettings,
}

impl std::fmt::Debug for UniverseScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniverseScanner")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl UniverseScanner {
    /// Build a scanner over the given provider boundary.
    #[must_use]
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        research: Arc<dyn ResearchProvider>,
        events: Arc<dyn FlowEventSink>,
        settings: ScannerSettings,
    ) -> Self {
        Self {
            market_data,
            research,
            events,
            settings,
        }
    }

    /// Run one universe scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] only for request misconfiguration, raised
    /// before any worker is dispatched.
    pub async fn scan(
        &self,
        request: &UniverseScanRequest,
    ) -> Result<UniverseScanResult, ScanError> {
        Self::validate(request)?;
        let tickers = universe::resolve(&request.universe)?;
        let scanned_count = tickers.len();

        tracing::info!(
            universe_size = scanned_count,
            min_score = request.min_discovery_score,
            signals_required = request.signals_required,
            "starting universe scan"
        );

        let deadline = Instant::now() + self.settings.scan_deadline;
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrency.max(1)));

        let survivors = self.quick_filter_phase(tickers, &semaphore, deadline).await;
        tracing::info!(survivors = survivors.len(), "quick filter complete");

        let mut candidates = self
            .deep_scan_phase(survivors, request, &semaphore, deadline)
            .await;

        // Deterministic ranking: descending score, ticker breaks ties.
        candidates.sort_by(|a, b| {
            b.discovery_score
                .total_cmp(&a.discovery_score)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        let excluded_count = scanned_count - candidates.len();
        candidates.truncate(request.max_results);

        tracing::info!(
            candidates = candidates.len(),
            excluded = excluded_count,
            "scan complete"
        );

        Ok(UniverseScanResult {
            candidates,
            scanned_count,
            excluded_count,
            as_of: Utc::now(),
        })
    }

    fn validate(request: &UniverseScanRequest) -> Result<(), ScanError> {
        if request.max_results == 0 {
            return Err(ScanError::invalid_request("max_results must be at least 1"));
        }
        if request.signals_required == 0 {
            return Err(ScanError::invalid_request(
                "signals_required must be at least 1",
            ));
        }
        if !(0.0..=100.0).contains(&request.min_discovery_score) {
            return Err(ScanError::invalid_request(
                "min_discovery_score must be within [0, 100]",
            ));
        }
        Ok(())
    }

    /// Phase 1: overview fetch and cheap filtering across the universe.
    async fn quick_filter_phase(
        &self,
        tickers: Vec<String>,
        semaphore: &Arc<Semaphore>,
        deadline: Instant,
    ) -> Vec<TickerOverview> {
        let mut tasks: JoinSet<Option<TickerOverview>> = JoinSet::new();

        for ticker in tickers {
            let market_data = Arc::clone(&self.market_data);
            let semaphore = Arc::clone(semaphore);
            let filter = self.settings.quick_filter;
            let ticker_timeout = self.settings.ticker_timeout;

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                match timeout(ticker_timeout, market_data.overview(&ticker)).await {
                    Ok(Ok(overview)) if filter.passes(&overview) => Some(overview),
                    Ok(Ok(_)) => {
                        tracing::debug!(ticker, "dropped by quick filter");
                        None
                    }
                    Ok(Err(err)) => {
                        tracing::debug!(ticker, error = %err, "overview fetch failed");
                        None
                    }
                    Err(_) => {
                        tracing::debug!(ticker, "overview fetch timed out");
                        None
                    }
                }
            });
        }

        let mut survivors = Vec::new();
        while let Some(outcome) = join_until(&mut tasks, deadline).await {
            if let Some(overview) = outcome {
                survivors.push(overview);
            }
        }
        survivors
    }

    /// Phase 2: full signal battery and auxiliary scoring on survivors.
    async fn deep_scan_phase(
        &self,
        survivors: Vec<TickerOverview>,
        request: &UniverseScanRequest,
        semaphore: &Arc<Semaphore>,
        deadline: Instant,
    ) -> Vec<GemCandidate> {
        let mut tasks: JoinSet<Option<GemCandidate>> = JoinSet::new();

        for overview in survivors {
            let market_data = Arc::clone(&self.market_data);
            let research = Arc::clone(&self.research);
            let events = Arc::clone(&self.events);
            let semaphore = Arc::clone(semaphore);
            let settings = self.settings.clone();
            let request = request.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                let ticker = overview.ticker.clone();
                let scan = deep_scan_ticker(
                    &*market_data,
                    &*research,
                    &*events,
                    &settings,
                    &request,
                    overview,
                );
                match timeout(settings.ticker_timeout, scan).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        tracing::debug!(ticker, "deep scan timed out");
                        None
                    }
                }
            });
        }

        let mut candidates = Vec::new();
        while let Some(outcome) = join_until(&mut tasks, deadline).await {
            if let Some(candidate) = outcome {
                candidates.push(candidate);
            }
        }
        candidates
    }
}

/// Join completed tasks until the set drains or the deadline passes.
/// Tasks still pending at the deadline are aborted and dropped.
async fn join_until<T: 'static>(tasks: &mut JoinSet<T>, deadline: Instant) -> Option<T> {
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            if !tasks.is_empty() {
                tracing::warn!(pending = tasks.len(), "scan deadline reached, dropping workers");
                tasks.abort_all();
            }
            return None;
        }

        match timeout(remaining, tasks.join_next()).await {
            Ok(Some(Ok(outcome))) => return Some(outcome),
            Ok(Some(Err(join_err))) => {
                // Aborted or panicked worker counts as an exclusion.
                tracing::debug!(error = %join_err, "worker did not complete");
            }
            Ok(None) => return None,
            Err(_) => {
                tracing::warn!(pending = tasks.len(), "scan deadline reached, dropping workers");
                tasks.abort_all();
                return None;
            }
        }
    }
}

/// One ticker's full deep-scan pipeline. Returns `None` whenever the
/// ticker does not qualify; every provider failure inside auxiliary
/// fetches degrades to neutral instead.
async fn deep_scan_ticker(
    market_data: &dyn MarketDataProvider,
    research: &dyn ResearchProvider,
    events: &dyn FlowEventSink,
    settings: &ScannerSettings,
    request: &UniverseScanRequest,
    overview: TickerOverview,
) -> Option<GemCandidate> {
    let ticker = overview.ticker.clone();

    let chain = match market_data.option_chain(&ticker).await {
        Ok(chain) => chain,
        Err(err) => {
            tracing::debug!(ticker, error = %err, "chain fetch failed");
            return None;
        }
    };

    // Degradable inputs: a missing history only disables the metric that
    // needs it.
    let iv_history = market_data.iv_history(&ticker).await.unwrap_or_default();
    let closes = market_data.daily_closes(&ticker).await.unwrap_or_default();

    let price = overview.price_f64();
    let current_iv = atm_iv(&chain.quotes, price);
    let iv_pctile = current_iv.and_then(|iv| iv_percentile(iv, &iv_history));

    let structural = detect_structural_signals(&chain, iv_pctile, &settings.structural);
    if structural.is_empty() {
        tracing::debug!(ticker, "no structural signals");
        return None;
    }

    let puts = chain.puts();
    let calls = chain.calls();
    let activity = detect_unusual_activity(&puts, &calls, &settings.flow);
    let flow_signals = generate_wheel_signals(&activity, &ticker);

    let cap_bonus = market_cap_bonus(overview.market_cap, request.prefer_small_caps);
    let coverage_bonus = analyst_coverage_bonus(
        overview.analyst_coverage,
        request.prefer_low_analyst_coverage,
    );
    let score = discovery_score(&structural, cap_bonus, coverage_bonus);

    let event = FlowEvent {
        ticker: ticker.clone(),
        discovery_score: score,
        structural_signal_count: structural.len(),
        unusual_put_flow: activity.stats.total_put_flow,
        unusual_call_flow: activity.stats.total_call_flow,
        as_of: chain.as_of,
    };
    if let Err(err) = events.publish(event).await {
        tracing::warn!(ticker, error = %err, "flow event sink rejected event");
    }

    let distinct_kinds: HashSet<_> = structural.iter().map(|s| s.kind).collect();
    if distinct_kinds.len() < request.signals_required || score < request.min_discovery_score {
        tracing::debug!(
            ticker,
            score,
            distinct_signals = distinct_kinds.len(),
            "below qualification thresholds"
        );
        return None;
    }

    // Auxiliary scoring: merged into the candidate, never into the
    // composite score. Every fetch degrades to neutral on failure.
    let fundamentals = research.fundamentals(&ticker).await.unwrap_or_default();
    let news = research.recent_news(&ticker).await.unwrap_or_default();
    let insiders = research.insider_activity(&ticker).await.unwrap_or_default();

    let quality = quality_score(&fundamentals);
    let hv = historical_volatility(&closes, settings.hv_window).unwrap_or(0.0);
    let iv_pct = current_iv.map_or(0.0, |iv| iv * 100.0);
    let ratio = iv_hv_ratio(iv_pct, hv);
    let insider_read = insider_sentiment(&insiders);
    let news_analysis = analyze_news(&news);

    let mut reasons = discovery_reasons(&structural, overview.market_cap, overview.analyst_coverage);
    if ratio > 1.5 {
        reasons.push(format!("IV/HV ratio {ratio:.2} - premium selling opportunity"));
    }
    if quality > 60.0 {
        reasons.push(format!("High-quality company (score {quality:.0}/100)"));
    }
    if fundamentals.roe_pct > 15.0 {
        reasons.push(format!("Strong ROE: {:.1}%", fundamentals.roe_pct));
    }
    match insider_read.sentiment {
        crate::models::InsiderSentiment::Bullish => reasons.push(format!(
            "Insider buying: {} buys vs {} sells",
            insiders.buys_90d, insiders.sells_90d
        )),
        crate::models::InsiderSentiment::Bearish => reasons.push(format!(
            "Insider selling: {} sells vs {} buys",
            insiders.sells_90d, insiders.buys_90d
        )),
        crate::models::InsiderSentiment::Neutral => {}
    }
    reasons.extend(news_analysis.reasons.iter().cloned());

    Some(GemCandidate {
        ticker,
        company_name: overview.company_name,
        sector: overview.sector,
        price: overview.price,
        market_cap: overview.market_cap,
        analyst_coverage: overview.analyst_coverage,
        discovery_score: score,
        structural_signals: structural,
        signals: flow_signals,
        quality_score: quality,
        iv_hv_ratio: ratio,
        iv_hv_interpretation: iv_hv_interpretation(ratio).to_string(),
        insider_sentiment: insider_read.sentiment,
        insider_buys_90d: insiders.buys_90d,
        insider_sells_90d: insiders.sells_90d,
        insider_score: insider_read.score,
        recent_news: news,
        news_sentiment: news_analysis.sentiment,
        catalyst_score: news_analysis.catalyst_score,
        discovery_reasons: reasons,
    })
}

// ============================================================================
// Tests
// ============================================================================
