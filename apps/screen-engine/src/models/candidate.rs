//! Discovery candidate ("gem") records and auxiliary research inputs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FlowSignal, StructuralSignal};

/// Net insider trading posture over the trailing 90 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsiderSentiment {
    /// Buys meaningfully outnumber sells.
    Bullish,
    /// Sells meaningfully outnumber buys.
    Bearish,
    /// Mixed or no activity.
    #[default]
    Neutral,
}

/// Aggregate news tone over the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSentiment {
    /// Positive catalysts dominate.
    Positive,
    /// Negative catalysts dominate.
    Negative,
    /// Both present without a clear winner.
    Mixed,
    /// No recognized catalysts.
    #[default]
    Neutral,
}

/// One recent news story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Publishing outlet.
    pub publisher: String,
    /// Canonical link.
    pub link: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
    /// Per-headline tone, when the source provides one.
    pub sentiment: Option<NewsSentiment>,
}

/// Fundamental quality inputs for a ticker.
///
/// Every field degrades to its zero default when the research provider is
/// unavailable; the quality scorer treats zeros as neutral.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Return on equity, percent.
    pub roe_pct: f64,
    /// Net profit margin, percent.
    pub profit_margin_pct: f64,
    /// Debt-to-equity ratio, percent (100 = 1.0x).
    pub debt_to_equity: f64,
    /// Trailing free cash flow, billions of dollars.
    pub free_cash_flow_b: f64,
    /// Shares held by insiders, percent of float.
    pub insider_ownership_pct: f64,
    /// Shares held by institutions, percent of float.
    pub institutional_ownership_pct: f64,
    /// Short interest, percent of float.
    pub short_interest_pct: f64,
    /// Days of average volume needed to cover the short interest.
    pub days_to_cover: f64,
    /// Percent upside to the mean analyst price target.
    pub analyst_target_upside_pct: f64,
}

/// Insider transaction counts over the trailing 90 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsiderActivity {
    /// Open-market buy transactions.
    pub buys_90d: u32,
    /// Open-market sell transactions.
    pub sells_90d: u32,
}

/// A discovered opportunity with its composite score and supporting
/// context.
///
/// `discovery_score` is always within [0, 100]. Auxiliary metrics (quality
/// score, IV/HV, insider and news sentiment) are carried for ranking
/// rationale; they do not feed back into the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemCandidate {
    /// Ticker symbol.
    pub ticker: String,
    /// Short company name.
    pub company_name: String,
    /// Sector classification.
    pub sector: String,
    /// Stock price at scan time.
    pub price: Decimal,
    /// Market capitalization in dollars.
    pub market_cap: f64,
    /// Number of covering analysts.
    pub analyst_coverage: u32,
    /// Composite discovery score in [0, 100].
    pub discovery_score: f64,
    /// Structural signals that fed the composite score.
    pub structural_signals: Vec<StructuralSignal>,
    /// Actionable flow signals (never empty).
    pub signals: Vec<FlowSignal>,
    /// Fundamental quality score in [0, 100].
    pub quality_score: f64,
    /// Implied-to-historical volatility ratio (0 when HV unavailable).
    pub iv_hv_ratio: f64,
    /// Plain-language reading of the IV/HV ratio.
    pub iv_hv_interpretation: String,
    /// Net insider posture.
    pub insider_sentiment: InsiderSentiment,
    /// Insider buys in the trailing 90 days.
    pub insider_buys_90d: u32,
    /// Insider sells in the trailing 90 days.
    pub insider_sells_90d: u32,
    /// Signed insider confidence score in [-15, 15].
    pub insider_score: f64,
    /// Recent news with per-headline tone.
    pub recent_news: Vec<NewsItem>,
    /// Aggregate news tone.
    pub news_sentiment: NewsSentiment,
    /// Signed catalyst score; positive for favorable catalysts.
    pub catalyst_score: f64,
    /// Up to five human-readable reasons this ticker surfaced.
    pub discovery_reasons: Vec<String>,
}
