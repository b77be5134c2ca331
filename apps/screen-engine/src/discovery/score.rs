//! Composite discovery score and its tiered bonuses.

use crate::models::StructuralSignal;

/// Weight of the averaged structural signal scores.
const SIGNAL_WEIGHT: f64 = 0.70;
/// Weight of the market-cap bonus.
const CAP_WEIGHT: f64 = 0.15;
/// Weight of the analyst-coverage bonus.
const COVERAGE_WEIGHT: f64 = 0.15;

/// Market-cap bonus tiers: smaller caps are more likely to be
/// under-the-radar. Zero when the preference is off or the cap is unknown.
#[must_use]
pub fn market_cap_bonus(market_cap: f64, prefer_small_caps: bool) -> f64 {
    if !prefer_small_caps || market_cap <= 0.0 {
        return 0.0;
    }

    if market_cap < 2e9 {
        15.0
    } else if market_cap < 10e9 {
        10.0
    } else if market_cap < 50e9 {
        5.0
    } else {
        0.0
    }
}

/// Analyst-coverage bonus tiers: fewer covering analysts means a less
/// picked-over name.
#[must_use]
pub fn analyst_coverage_bonus(analyst_coverage: u32, prefer_low_coverage: bool) -> f64 {
    if !prefer_low_coverage {
        return 0.0;
    }

    if analyst_coverage < 5 {
        15.0
    } else if analyst_coverage < 10 {
        10.0
    } else if analyst_coverage < 20 {
        5.0
    } else {
        0.0
    }
}

/// Composite discovery score in [0, 100].
///
/// `0.70 · avg(signal scores) + 0.15 · cap bonus + 0.15 · coverage bonus`,
/// clamped. With no fired signals the signal term is zero. Auxiliary
/// quality/insider/news scores deliberately stay out of this formula.
#[must_use]
pub fn discovery_score(signals: &[StructuralSignal], cap_bonus: f64, coverage_bonus: f64) -> f64 {
    let signal_avg = if signals.is_empty() {
        0.0
    } else {
        signals.iter().map(|s| s.score).sum::<f64>() / signals.len() as f64
    };

    let score =
        SIGNAL_WEIGHT * signal_avg + CAP_WEIGHT * cap_bonus + COVERAGE_WEIGHT * coverage_bonus;
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SignalStrength, StructuralSignalKind};
    use proptest::prelude::*;
    use test_case::test_case;

    fn signal(score: f64) -> StructuralSignal {
        StructuralSignal {
            kind: StructuralSignalKind::UnusualVolume,
            strength: SignalStrength::Medium,
            score,
            details: String::new(),
        }
    }

    #[test_case(1.5e9, 15.0; "small cap")]
    #[test_case(5e9, 10.0; "mid cap")]
    #[test_case(30e9, 5.0; "large cap")]
    #[test_case(80e9, 0.0; "mega cap")]
    #[test_case(0.0, 0.0; "unknown cap")]
    fn cap_tiers(cap: f64, expected: f64) {
        assert_eq!(market_cap_bonus(cap, true), expected);
        assert_eq!(market_cap_bonus(cap, false), 0.0);
    }

    #[test_case(3, 15.0; "barely covered")]
    #[test_case(7, 10.0; "lightly covered")]
    #[test_case(15, 5.0; "moderately covered")]
    #[test_case(25, 0.0; "heavily covered")]
    fn coverage_tiers(analysts: u32, expected: f64) {
        assert_eq!(analyst_coverage_bonus(analysts, true), expected);
        assert_eq!(analyst_coverage_bonus(analysts, false), 0.0);
    }

    #[test]
    fn composite_weights() {
        let signals = vec![signal(60.0), signal(80.0)];
        let score = discovery_score(&signals, 15.0, 10.0);
        // 0.70*70 + 0.15*15 + 0.15*10 = 49 + 2.25 + 1.5
        assert!((score - 52.75).abs() < 1e-9);
    }

    #[test]
    fn no_signals_scores_only_bonuses() {
        let score = discovery_score(&[], 15.0, 15.0);
        assert!((score - 4.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_score_in_range(
            scores in proptest::collection::vec(0.0f64..=100.0, 0..6),
            cap in prop_oneof![Just(0.0), Just(5.0), Just(10.0), Just(15.0)],
            coverage in prop_oneof![Just(0.0), Just(5.0), Just(10.0), Just(15.0)],
        ) {
            let signals: Vec<StructuralSignal> = scores.into_iter().map(signal).collect();
            let score = discovery_score(&signals, cap, coverage);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_raising_one_signal_never_lowers_score(
            scores in proptest::collection::vec(0.0f64..=100.0, 1..6),
            bump in 0.0f64..50.0,
        ) {
            let signals: Vec<StructuralSignal> = scores.iter().copied().map(signal).collect();
            let base = discovery_score(&signals, 10.0, 10.0);

            let mut raised = signals;
            raised[0].score = (raised[0].score + bump).min(100.0);
            let after = discovery_score(&raised, 10.0, 10.0);
            prop_assert!(after >= base - 1e-9);
        }
    }
}
