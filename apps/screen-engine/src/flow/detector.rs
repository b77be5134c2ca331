//! Derived flow metrics and unusual-activity detection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::OptionQuote;

/// Contract multiplier for equity options.
const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Thresholds that classify a contract as unusual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowThresholds {
    /// Minimum volume/open-interest ratio to flag.
    pub vol_oi_threshold: f64,
    /// Minimum dollar premium flow to flag.
    pub premium_threshold: f64,
}

impl Default for FlowThresholds {
    fn default() -> Self {
        Self {
            vol_oi_threshold: 2.0,
            premium_threshold: 500_000.0,
        }
    }
}

/// Volume/open-interest ratio, undefined when nothing is outstanding.
#[must_use]
pub fn volume_to_oi(quote: &OptionQuote) -> Option<f64> {
    if quote.open_interest == 0 {
        return None;
    }
    Some(quote.volume as f64 / quote.open_interest as f64)
}

/// Dollar premium traded through a contract today.
#[must_use]
pub fn premium_flow(quote: &OptionQuote) -> f64 {
    quote.volume as f64 * quote.last_f64() * CONTRACT_MULTIPLIER
}

/// One contract with its derived flow metrics attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFlow {
    /// The underlying quote.
    pub quote: OptionQuote,
    /// Volume/open-interest ratio, `None` when open interest is zero.
    pub vol_to_oi: Option<f64>,
    /// Dollar premium flow.
    pub premium_flow: f64,
}

impl ContractFlow {
    fn from_quote(quote: &OptionQuote) -> Self {
        Self {
            vol_to_oi: volume_to_oi(quote),
            premium_flow: premium_flow(quote),
            quote: quote.clone(),
        }
    }

    fn is_unusual(&self, thresholds: &FlowThresholds) -> bool {
        self.vol_to_oi
            .is_some_and(|ratio| ratio > thresholds.vol_oi_threshold)
            || self.premium_flow > thresholds.premium_threshold
    }
}

/// Open-interest put/call ratio for one expiration bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationRatio {
    /// Expiration date of the bucket.
    pub expiration: NaiveDate,
    /// Total put open interest at this expiration.
    pub put_oi: u64,
    /// Total call open interest at this expiration.
    pub call_oi: u64,
    /// Put OI over call OI, `None` when call OI is zero.
    pub pcr: Option<f64>,
}

/// Open-interest PCR per expiration, nearest expiration first.
#[must_use]
pub fn put_call_ratio_by_expiration(
    puts: &[OptionQuote],
    calls: &[OptionQuote],
) -> Vec<ExpirationRatio> {
    let mut buckets: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for quote in puts {
        buckets.entry(quote.expiration).or_default().0 += quote.open_interest;
    }
    for quote in calls {
        buckets.entry(quote.expiration).or_default().1 += quote.open_interest;
    }

    buckets
        .into_iter()
        .map(|(expiration, (put_oi, call_oi))| ExpirationRatio {
            expiration,
            put_oi,
            call_oi,
            pcr: (call_oi > 0).then(|| put_oi as f64 / call_oi as f64),
        })
        .collect()
}

/// Aggregate statistics over the unusual subsets only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowStats {
    /// Dollar premium across unusual puts.
    pub total_put_flow: f64,
    /// Dollar premium across unusual calls.
    pub total_call_flow: f64,
    /// Contracts traded across unusual puts.
    pub total_put_volume: u64,
    /// Contracts traded across unusual calls.
    pub total_call_volume: u64,
    /// Put flow over call flow, zero when there is no unusual call flow.
    pub put_call_flow_ratio: f64,
}

/// Everything the detector produces for one ticker's chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusualActivity {
    /// Put contracts flagged unusual.
    pub unusual_puts: Vec<ContractFlow>,
    /// Call contracts flagged unusual.
    pub unusual_calls: Vec<ContractFlow>,
    /// Open-interest PCR per expiration, nearest first. Built over the
    /// full chain, not just the unusual subsets.
    pub pcr_by_expiration: Vec<ExpirationRatio>,
    /// Aggregates over the unusual subsets.
    pub stats: FlowStats,
}

/// Flag unusual contracts on both sides and aggregate their flow.
///
/// A contract is unusual when its volume/OI ratio exceeds
/// `vol_oi_threshold` or its premium flow exceeds `premium_threshold`.
/// Rows with zero open interest can still qualify through premium flow.
#[must_use]
pub fn detect_unusual_activity(
    puts: &[OptionQuote],
    calls: &[OptionQuote],
    thresholds: &FlowThresholds,
) -> UnusualActivity {
    let unusual_puts: Vec<ContractFlow> = puts
        .iter()
        .map(ContractFlow::from_quote)
        .filter(|flow| flow.is_unusual(thresholds))
        .collect();
    let unusual_calls: Vec<ContractFlow> = calls
        .iter()
        .map(ContractFlow::from_quote)
        .filter(|flow| flow.is_unusual(thresholds))
        .collect();

    let total_put_flow: f64 = unusual_puts.iter().map(|f| f.premium_flow).sum();
    let total_call_flow: f64 = unusual_calls.iter().map(|f| f.premium_flow).sum();
    let total_put_volume: u64 = unusual_puts.iter().map(|f| f.quote.volume).sum();
    let total_call_volume: u64 = unusual_calls.iter().map(|f| f.quote.volume).sum();

    let put_call_flow_ratio = if total_call_flow > 0.0 {
        total_put_flow / total_call_flow
    } else {
        0.0
    };

    UnusualActivity {
        unusual_puts,
        unusual_calls,
        pcr_by_expiration: put_call_ratio_by_expiration(puts, calls),
        stats: FlowStats {
            total_put_flow,
            total_call_flow,
            total_put_volume,
            total_call_volume,
            put_call_flow_ratio,
        },
    }
}

/// The most unusual strikes by premium flow, per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopStrikes {
    /// Unusual puts, descending by premium flow.
    pub top_puts: Vec<ContractFlow>,
    /// Unusual calls, descending by premium flow.
    pub top_calls: Vec<ContractFlow>,
}

/// Top-N unusual strikes by premium flow for each side.
#[must_use]
pub fn top_unusual_strikes(activity: &UnusualActivity, top_n: usize) -> TopStrikes {
    let take_top = |flows: &[ContractFlow]| {
        let mut sorted = flows.to_vec();
        sorted.sort_by(|a, b| b.premium_flow.total_cmp(&a.premium_flow));
        sorted.truncate(top_n);
        sorted
    };

    TopStrikes {
        top_puts: take_top(&activity.unusual_puts),
        top_calls: take_top(&activity.unusual_calls),
    }
}

// ============================================================================
// Tests
// ============================================================================
