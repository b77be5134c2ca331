//! The four structural checks feeding the composite discovery score.

use serde::{Deserialize, Serialize};

use crate::models::{OptionChainSnapshot, SignalStrength, StructuralSignal, StructuralSignalKind};

/// Thresholds for the structural signal battery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralThresholds {
    /// Chain-wide volume/OI ratio above which volume is unusual.
    pub unusual_volume_ratio: f64,
    /// Historical IV percentile above which IV counts as surging.
    pub iv_surge_percentile: f64,
    /// Total open interest above which positioning is concentrated.
    pub oi_concentration: u64,
    /// Put/call volume ratio below which sentiment is extremely bullish.
    pub pcr_low: f64,
    /// Put/call volume ratio above which sentiment is extremely bearish.
    pub pcr_high: f64,
}

impl Default for StructuralThresholds {
    fn default() -> Self {
        Self {
            unusual_volume_ratio: 0.5,
            iv_surge_percentile: 70.0,
            oi_concentration: 10_000,
            pcr_low: 0.3,
            pcr_high: 3.0,
        }
    }
}

fn classify(value: f64, boundaries: [f64; 3]) -> SignalStrength {
    if value < boundaries[0] {
        SignalStrength::Low
    } else if value < boundaries[1] {
        SignalStrength::Medium
    } else if value < boundaries[2] {
        SignalStrength::High
    } else {
        SignalStrength::Extreme
    }
}

/// Run the structural signal battery over one ticker's chain.
///
/// `iv_percentile` is the current IV's percentile against its own history;
/// `None` (no usable history) simply means the IV-surge check cannot fire.
/// Each check appends at most one signal, so at most four distinct kinds
/// are returned.
#[must_use]
pub fn detect_structural_signals(
    snapshot: &OptionChainSnapshot,
    iv_percentile: Option<f64>,
    thresholds: &StructuralThresholds,
) -> Vec<StructuralSignal> {
    let mut signals = Vec::new();

    let total_volume = snapshot.total_volume();
    let total_oi = snapshot.total_open_interest();

    // Check 1: chain volume well above open interest.
    if total_oi > 0 {
        let ratio = total_volume as f64 / total_oi as f64;
        if ratio > thresholds.unusual_volume_ratio {
            signals.push(StructuralSignal {
                kind: StructuralSignalKind::UnusualVolume,
                strength: classify(ratio, [0.5, 1.0, 2.0]),
                score: (ratio * 30.0).min(100.0),
                details: format!("chain volume {ratio:.2}x open interest"),
            });
        }
    }

    // Check 2: implied volatility elevated against its own history.
    if let Some(percentile) = iv_percentile {
        if percentile > thresholds.iv_surge_percentile {
            signals.push(StructuralSignal {
                kind: StructuralSignalKind::IvSurge,
                strength: classify(percentile, [70.0, 80.0, 90.0]),
                score: percentile.min(100.0),
                details: format!("IV at the {percentile:.0}th percentile of its history"),
            });
        }
    }

    // Check 3: concentrated open interest.
    if total_oi > thresholds.oi_concentration {
        signals.push(StructuralSignal {
            kind: StructuralSignalKind::OiConcentration,
            strength: classify(total_oi as f64, [10_000.0, 50_000.0, 100_000.0]),
            score: (total_oi as f64 / 1_000.0 * 5.0).min(100.0),
            details: format!("{total_oi} contracts outstanding"),
        });
    }

    // Check 4: put/call volume ratio at a sentiment extreme. Needs volume
    // on both sides to be meaningful.
    let put_volume: u64 = snapshot.puts().iter().map(|q| q.volume).sum();
    let call_volume: u64 = snapshot.calls().iter().map(|q| q.volume).sum();
    if put_volume > 0 && call_volume > 0 {
        let pcr = put_volume as f64 / call_volume as f64;
        if pcr < thresholds.pcr_low || pcr > thresholds.pcr_high {
            let sentiment = if pcr < thresholds.pcr_low {
                "extremely bullish"
            } else {
                "extremely bearish"
            };
            signals.push(StructuralSignal {
                kind: StructuralSignalKind::PcrExtreme,
                strength: SignalStrength::High,
                score: (pcr.ln().abs() * 40.0).min(100.0),
                details: format!("put/call ratio {pcr:.2} ({sentiment})"),
            });
        }
    }

    signals
}

/// Maximum reasons attached to a candidate.
const MAX_REASONS: usize = 5;

/// Human-readable reasons a ticker surfaced, from its fired signals plus
/// cap and coverage context. Capped at five.
#[must_use]
pub fn discovery_reasons(
    signals: &[StructuralSignal],
    market_cap: f64,
    analyst_coverage: u32,
) -> Vec<String> {
    let mut reasons = Vec::new();

    for signal in signals {
        let reason = match signal.kind {
            StructuralSignalKind::UnusualVolume => {
                format!("Unusual options volume: {}", signal.details)
            }
            StructuralSignalKind::IvSurge => format!("Volatility surge: {}", signal.details),
            StructuralSignalKind::OiConcentration => {
                format!("Institutional positioning: {}", signal.details)
            }
            StructuralSignalKind::PcrExtreme => format!("Sentiment extreme: {}", signal.details),
        };
        reasons.push(reason);
    }

    if market_cap > 0.0 && market_cap < 2e9 {
        reasons.push("Small cap (under-the-radar)".to_string());
    }
    if analyst_coverage < 5 {
        reasons.push(format!("Limited analyst coverage ({analyst_coverage} analysts)"));
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

// ============================================================================
// Tests
// ============================================================================
