//! Option quote and chain snapshot records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Side of an option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    /// Put contract.
    Put,
    /// Call contract.
    Call,
}

impl std::fmt::Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Put => write!(f, "put"),
            Self::Call => write!(f, "call"),
        }
    }
}

/// A single option contract quote as returned by a chain provider.
///
/// `implied_volatility` is `None` when the provider could not compute it
/// (stale or crossed markets); downstream math treats that as a typed
/// missing value rather than a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price.
    pub strike: Decimal,
    /// Contract expiration date.
    pub expiration: NaiveDate,
    /// Put or call.
    pub side: OptionSide,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Last traded price.
    pub last: Decimal,
    /// Contracts traded today.
    pub volume: u64,
    /// Outstanding contracts.
    pub open_interest: u64,
    /// Implied volatility as a decimal (0.25 = 25%), if available.
    pub implied_volatility: Option<f64>,
}

impl OptionQuote {
    /// Strike as `f64` for probability math.
    #[must_use]
    pub fn strike_f64(&self) -> f64 {
        self.strike.to_f64().unwrap_or(0.0)
    }

    /// Last traded price as `f64`.
    #[must_use]
    pub fn last_f64(&self) -> f64 {
        self.last.to_f64().unwrap_or(0.0)
    }
}

/// A point-in-time snapshot of one ticker's option chain.
///
/// Snapshots are ephemeral: fetched per scan cycle and dropped with the
/// scan. Nothing in this subsystem persists them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    /// Underlying ticker symbol.
    pub ticker: String,
    /// When the provider produced this snapshot.
    pub as_of: DateTime<Utc>,
    /// All quotes across strikes and expirations.
    pub quotes: Vec<OptionQuote>,
}

impl OptionChainSnapshot {
    /// All put quotes in the snapshot.
    #[must_use]
    pub fn puts(&self) -> Vec<OptionQuote> {
        self.quotes
            .iter()
            .filter(|q| q.side == OptionSide::Put)
            .cloned()
            .collect()
    }

    /// All call quotes in the snapshot.
    #[must_use]
    pub fn calls(&self) -> Vec<OptionQuote> {
        self.quotes
            .iter()
            .filter(|q| q.side == OptionSide::Call)
            .cloned()
            .collect()
    }

    /// Total traded volume across the chain.
    #[must_use]
    pub fn total_volume(&self) -> u64 {
        self.quotes.iter().map(|q| q.volume).sum()
    }

    /// Total open interest across the chain.
    #[must_use]
    pub fn total_open_interest(&self) -> u64 {
        self.quotes.iter().map(|q| q.open_interest).sum()
    }
}

/// Cheap per-ticker summary used by the phase-1 quick filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerOverview {
    /// Ticker symbol.
    pub ticker: String,
    /// Short company name.
    pub company_name: String,
    /// Sector classification, `"Unknown"` when the provider has none.
    pub sector: String,
    /// Last stock price.
    pub price: Decimal,
    /// Market capitalization in dollars.
    pub market_cap: f64,
    /// Average daily share volume.
    pub average_volume: u64,
    /// Number of covering analysts.
    pub analyst_coverage: u32,
    /// Whether the ticker has listed options.
    pub has_listed_options: bool,
}

impl TickerOverview {
    /// Stock price as `f64`.
    #[must_use]
    pub fn price_f64(&self) -> f64 {
        self.price.to_f64().unwrap_or(0.0)
    }
}
