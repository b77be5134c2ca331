//! Universe scan request and result types.
//!
//! These two types are the sole contract between the scanning core and any
//! presentation or automation surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

use super::GemCandidate;

/// A named, curated scanning universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniverseName {
    /// Curated large-cap universe (S&P 500-like).
    LargeCap,
    /// Curated NASDAQ 100 universe.
    // rename_all would emit "nasdaq100"; keep the underscore form.
    #[serde(rename = "nasdaq_100")]
    Nasdaq100,
    /// Union of the large-cap and NASDAQ universes.
    Combined,
}

impl std::str::FromStr for UniverseName {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "large_cap" => Ok(Self::LargeCap),
            "nasdaq_100" => Ok(Self::Nasdaq100),
            "combined" => Ok(Self::Combined),
            other => Err(ScanError::UnknownUniverse {
                name: other.to_string(),
            }),
        }
    }
}

/// The set of tickers a scan should cover: a named preset or an explicit
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Universe {
    /// One of the curated presets.
    Named(UniverseName),
    /// An explicit ticker list.
    Explicit(Vec<String>),
}

impl Default for Universe {
    fn default() -> Self {
        Self::Named(UniverseName::LargeCap)
    }
}

/// Parameters for one universe scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseScanRequest {
    /// Universe to scan.
    #[serde(default)]
    pub universe: Universe,
    /// Minimum composite score for a candidate to qualify.
    #[serde(default = "default_min_discovery_score")]
    pub min_discovery_score: f64,
    /// Maximum number of ranked candidates to return.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Minimum count of distinct structural signal types required.
    #[serde(default = "default_signals_required")]
    pub signals_required: usize,
    /// Apply the market-cap bonus tiers (favor under-the-radar names).
    #[serde(default = "default_true")]
    pub prefer_small_caps: bool,
    /// Apply the analyst-coverage bonus tiers.
    #[serde(default = "default_true")]
    pub prefer_low_analyst_coverage: bool,
}

impl Default for UniverseScanRequest {
    fn default() -> Self {
        Self {
            universe: Universe::default(),
            min_discovery_score: default_min_discovery_score(),
            max_results: default_max_results(),
            signals_required: default_signals_required(),
            prefer_small_caps: true,
            prefer_low_analyst_coverage: true,
        }
    }
}

const fn default_min_discovery_score() -> f64 {
    60.0
}
const fn default_max_results() -> usize {
    20
}
const fn default_signals_required() -> usize {
    2
}
const fn default_true() -> bool {
    true
}

/// Outcome of one universe scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseScanResult {
    /// Qualified candidates, descending by discovery score, truncated to
    /// the requested maximum.
    pub candidates: Vec<GemCandidate>,
    /// Number of tickers the scan attempted.
    pub scanned_count: usize,
    /// Tickers excluded by filters, thresholds, timeouts, or provider
    /// failures.
    pub excluded_count: usize,
    /// When the scan completed.
    pub as_of: DateTime<Utc>,
}
