//! Rule cascade turning flow aggregates into actionable signals.

use crate::models::{FlowSignal, FlowSignalKind, Severity};

use super::detector::UnusualActivity;

/// Dollar premium flow that counts as heavy institutional buying.
const HEAVY_FLOW_THRESHOLD: f64 = 1_000_000.0;
/// Put/call flow ratio that reads as extreme bearish positioning.
const BEARISH_FLOW_RATIO: f64 = 3.0;
/// Put/call flow ratio below which flow reads bullish.
const BULLISH_FLOW_RATIO: f64 = 0.33;
/// Near-term PCR above which positioning reads extreme bearish.
const BEARISH_PCR: f64 = 2.0;
/// Near-term PCR below which positioning reads bullish.
const BULLISH_PCR: f64 = 0.5;
/// Expiration buckets that count as near-term for the wheel.
const NEAR_TERM_EXPIRATIONS: usize = 2;

/// Generate wheel-strategy signals from detected flow, in fixed priority
/// order.
///
/// Each rule appends at most one signal; several may fire for the same
/// chain. When nothing fires, a single all-clear signal is emitted, so the
/// result is never empty.
#[must_use]
pub fn generate_wheel_signals(activity: &UnusualActivity, ticker: &str) -> Vec<FlowSignal> {
    let mut signals = Vec::new();
    let stats = &activity.stats;

    // Rule 1: heavy put buying means institutions are positioned for
    // downside.
    if stats.total_put_flow > HEAVY_FLOW_THRESHOLD {
        signals.push(FlowSignal {
            kind: FlowSignalKind::Warning,
            severity: Severity::High,
            title: "Heavy Institutional Put Buying".to_string(),
            message: format!(
                "${} in unusual put premium flow",
                format_count(stats.total_put_flow)
            ),
            recommendation: format!(
                "AVOID selling puts on {ticker}. Institutions are betting on downside."
            ),
            details: format!("{} contracts traded", format_count(stats.total_put_volume as f64)),
        });
    }

    // Rule 2: heavy call buying often precedes IV expansion.
    if stats.total_call_flow > HEAVY_FLOW_THRESHOLD {
        signals.push(FlowSignal {
            kind: FlowSignalKind::Info,
            severity: Severity::Medium,
            title: "Heavy Call Buying Detected".to_string(),
            message: format!(
                "${} in unusual call premium flow",
                format_count(stats.total_call_flow)
            ),
            recommendation: format!(
                "Potential IV expansion on {ticker}. Better covered call premiums likely soon."
            ),
            details: format!(
                "{} contracts traded",
                format_count(stats.total_call_volume as f64)
            ),
        });
    }

    // Rule 3/4: flow imbalance, one direction or the other.
    if stats.put_call_flow_ratio > BEARISH_FLOW_RATIO {
        signals.push(FlowSignal {
            kind: FlowSignalKind::Warning,
            severity: Severity::High,
            title: "Extreme Bearish Flow".to_string(),
            message: format!("Put flow is {:.1}x call flow", stats.put_call_flow_ratio),
            recommendation: format!(
                "Strong bearish positioning on {ticker}. Reduce put-selling exposure."
            ),
            details: "Market expects significant downside".to_string(),
        });
    } else if stats.put_call_flow_ratio > 0.0 && stats.put_call_flow_ratio < BULLISH_FLOW_RATIO {
        signals.push(FlowSignal {
            kind: FlowSignalKind::Success,
            severity: Severity::Low,
            title: "Bullish Flow Detected".to_string(),
            message: format!(
                "Call flow is {:.1}x put flow",
                1.0 / stats.put_call_flow_ratio
            ),
            recommendation: format!(
                "Bullish sentiment on {ticker}. Good environment for selling puts."
            ),
            details: "Market expects upside or stability".to_string(),
        });
    } else if stats.put_call_flow_ratio == 0.0 && stats.total_call_flow > 0.0 {
        signals.push(FlowSignal {
            kind: FlowSignalKind::Success,
            severity: Severity::Low,
            title: "Pure Bullish Flow".to_string(),
            message: format!(
                "Only call flow detected (${}), no unusual put activity",
                format_count(stats.total_call_flow)
            ),
            recommendation: format!(
                "Very bullish sentiment on {ticker}. Excellent environment for selling puts."
            ),
            details: "Zero put flow = extremely bullish positioning".to_string(),
        });
    }

    // Rule 5: extreme open-interest PCR on the expirations the wheel
    // actually sells into.
    let near_term_max_pcr = activity
        .pcr_by_expiration
        .iter()
        .take(NEAR_TERM_EXPIRATIONS)
        .filter_map(|bucket| bucket.pcr)
        .fold(None, |max: Option<f64>, pcr| {
            Some(max.map_or(pcr, |m| m.max(pcr)))
        });

    if let Some(max_pcr) = near_term_max_pcr {
        if max_pcr > BEARISH_PCR {
            signals.push(FlowSignal {
                kind: FlowSignalKind::Warning,
                severity: Severity::Medium,
                title: "Extreme Bearish Positioning".to_string(),
                message: format!("PCR of {max_pcr:.2} on near-term expirations"),
                recommendation: "Wait for sentiment to normalize before selling puts.".to_string(),
                details: "More than 2x puts vs calls outstanding".to_string(),
            });
        } else if max_pcr < BULLISH_PCR {
            signals.push(FlowSignal {
                kind: FlowSignalKind::Info,
                severity: Severity::Low,
                title: "Bullish Positioning".to_string(),
                message: format!("PCR of {max_pcr:.2} on near-term expirations"),
                recommendation: "Favorable environment for wheel strategy.".to_string(),
                details: "Calls significantly outnumber puts".to_string(),
            });
        }
    }

    // Rule 6: never return an empty list.
    if signals.is_empty() {
        signals.push(FlowSignal {
            kind: FlowSignalKind::Success,
            severity: Severity::Low,
            title: "No Unusual Activity".to_string(),
            message: "Normal options flow detected".to_string(),
            recommendation: format!("No red flags for wheel strategy on {ticker}."),
            details: "Proceed with standard analysis".to_string(),
        });
    }

    signals
}

/// Round to whole units and insert thousands separators.
fn format_count(value: f64) -> String {
    let whole = value.round().abs() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < -0.5 { format!("-{out}") } else { out }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::detector::{ExpirationRatio, FlowStats, UnusualActivity};
    use chrono::NaiveDate;
    use test_case::test_case;

    fn activity(stats: FlowStats, pcr: Vec<Option<f64>>) -> UnusualActivity {
        let base = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        UnusualActivity {
            unusual_puts: Vec::new(),
            unusual_calls: Vec::new(),
            pcr_by_expiration: pcr
                .into_iter()
                .enumerate()
                .map(|(i, pcr)| ExpirationRatio {
                    expiration: base + chrono::Days::new(7 * i as u64),
                    put_oi: 0,
                    call_oi: 0,
                    pcr,
                })
                .collect(),
            stats,
        }
    }

    #[test]
    fn heavy_put_buying_fires_high_warning() {
        let a = activity(
            FlowStats {
                total_put_flow: 1_500_000.0,
                total_put_volume: 3000,
                ..FlowStats::default()
            },
            vec![],
        );
        let signals = generate_wheel_signals(&a, "AAPL");
        assert_eq!(signals[0].kind, FlowSignalKind::Warning);
        assert_eq!(signals[0].severity, Severity::High);
        assert!(signals[0].message.contains("1,500,000"));
        assert!(signals[0].recommendation.contains("AAPL"));
    }

    #[test]
    fn bearish_flow_ratio_fires() {
        let a = activity(
            FlowStats {
                total_put_flow: 600_000.0,
                total_call_flow: 100_000.0,
                put_call_flow_ratio: 6.0,
                ..FlowStats::default()
            },
            vec![],
        );
        let signals = generate_wheel_signals(&a, "TSLA");
        assert!(signals.iter().any(|s| s.title == "Extreme Bearish Flow"));
    }

    #[test]
    fn pure_call_flow_is_bullish() {
        let a = activity(
            FlowStats {
                total_call_flow: 600_000.0,
                put_call_flow_ratio: 0.0,
                ..FlowStats::default()
            },
            vec![],
        );
        let signals = generate_wheel_signals(&a, "NVDA");
        assert!(signals.iter().any(|s| s.title == "Pure Bullish Flow"));
        assert!(signals.iter().all(|s| s.severity == Severity::Low));
    }

    // The rule reads the max over the first two buckets, so the second
    // bucket must not mask the case under test.
    #[test_case(2.5, 1.0, "Extreme Bearish Positioning"; "high near-term pcr")]
    #[test_case(0.3, 0.4, "Bullish Positioning"; "low near-term pcr")]
    fn near_term_pcr_extremes(first: f64, second: f64, expected_title: &str) {
        let a = activity(FlowStats::default(), vec![Some(first), Some(second)]);
        let signals = generate_wheel_signals(&a, "AMD");
        assert!(signals.iter().any(|s| s.title == expected_title));
    }

    #[test]
    fn near_term_max_masks_one_low_bucket() {
        // 0.3 next to a neutral 1.0: max is 1.0, nothing fires.
        let a = activity(FlowStats::default(), vec![Some(0.3), Some(1.0)]);
        let signals = generate_wheel_signals(&a, "AMD");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].title, "No Unusual Activity");
    }

    #[test]
    fn pcr_beyond_near_term_is_ignored() {
        // The extreme bucket is the third expiration out.
        let a = activity(FlowStats::default(), vec![Some(1.0), Some(1.0), Some(5.0)]);
        let signals = generate_wheel_signals(&a, "AMD");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].title, "No Unusual Activity");
    }

    #[test]
    fn all_quiet_yields_single_all_clear() {
        let a = activity(FlowStats::default(), vec![]);
        let signals = generate_wheel_signals(&a, "KO");
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, FlowSignalKind::Success);
        assert_eq!(signals[0].severity, Severity::Low);
        assert!(signals[0].recommendation.contains("KO"));
    }

    #[test]
    fn multiple_rules_stack_in_priority_order() {
        let a = activity(
            FlowStats {
                total_put_flow: 4_000_000.0,
                total_call_flow: 1_100_000.0,
                total_put_volume: 8000,
                total_call_volume: 2000,
                put_call_flow_ratio: 4_000_000.0 / 1_100_000.0,
            },
            vec![Some(2.5)],
        );
        let signals = generate_wheel_signals(&a, "META");
        let titles: Vec<&str> = signals.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Heavy Institutional Put Buying",
                "Heavy Call Buying Detected",
                "Extreme Bearish Flow",
                "Extreme Bearish Positioning",
            ]
        );
    }

    #[test]
    fn thousands_separator_formatting() {
        assert_eq!(format_count(500.0), "500");
        assert_eq!(format_count(1_500_000.0), "1,500,000");
        assert_eq!(format_count(42.4), "42");
    }
}
