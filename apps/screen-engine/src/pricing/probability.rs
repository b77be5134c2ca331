//! Seller-side probability of profit and expected-move math.
//!
//! Black-Scholes uses standard mathematical notation (s, k, t, sigma).

#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use serde::{Deserialize, Serialize};

use crate::models::{OptionQuote, OptionSide};

use super::DAYS_PER_YEAR;

/// Standard normal CDF (cumulative distribution function).
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Probability the contract expires worthless, from the seller's side.
///
/// For puts this is the probability the stock finishes above the strike;
/// for calls, below it. Computed from the Black-Scholes `d2` term:
/// `d2 = (ln(S/K) + (r - 0.5σ²)·T) / (σ·√T)` with `T = dte/365`.
///
/// Returns the probability as a percentage in [0, 100], or `None` when any
/// of DTE, volatility, stock price, or strike is non-positive.
#[must_use]
pub fn probability_of_profit(
    stock_price: f64,
    strike: f64,
    dte: i64,
    implied_volatility: f64,
    side: OptionSide,
    risk_free_rate: f64,
) -> Option<f64> {
    if dte <= 0 || implied_volatility <= 0.0 || stock_price <= 0.0 || strike <= 0.0 {
        return None;
    }

    let t = dte as f64 / DAYS_PER_YEAR;
    let d2 = ((stock_price / strike).ln()
        + (risk_free_rate - 0.5 * implied_volatility * implied_volatility) * t)
        / (implied_volatility * t.sqrt());

    let pop = match side {
        // Put seller profits when the stock stays above the strike.
        OptionSide::Put => norm_cdf(d2) * 100.0,
        // Call seller profits when the stock stays below the strike.
        OptionSide::Call => norm_cdf(-d2) * 100.0,
    };

    Some(pop)
}

/// Approximate delta recovered from a probability of profit.
///
/// Put delta ≈ −(100 − PoP)/100; call delta ≈ PoP/100.
#[must_use]
pub fn delta_from_pop(pop: f64, side: OptionSide) -> f64 {
    match side {
        OptionSide::Put => -(100.0 - pop) / 100.0,
        OptionSide::Call => pop / 100.0,
    }
}

/// Expected stock move implied by ATM volatility over a horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedMove {
    /// Expected move in dollars.
    pub move_dollars: f64,
    /// Expected move as a percentage of the stock price.
    pub move_percent: f64,
    /// Stock price plus the move.
    pub upper_bound: f64,
    /// Stock price minus the move.
    pub lower_bound: f64,
    /// Approximate probability the stock stays within the bounds, percent.
    pub probability_pct: f64,
    /// Number of standard deviations the bounds cover.
    pub std_deviations: f64,
}

/// Containment probabilities for common standard-deviation multipliers.
const CONTAINMENT_TABLE: &[(f64, f64)] = &[
    (1.0, 68.27),
    (1.5, 86.64),
    (2.0, 95.45),
    (2.5, 98.76),
    (3.0, 99.73),
];

fn containment_probability(std_deviations: f64) -> f64 {
    for (k, pct) in CONTAINMENT_TABLE {
        if (std_deviations - k).abs() < f64::EPSILON {
            return *pct;
        }
    }
    (norm_cdf(std_deviations) - norm_cdf(-std_deviations)) * 100.0
}

/// Expected move: `S · σ · √(dte/365) · k` for `k` standard deviations.
///
/// Returns `None` when DTE, volatility, or the stock price is
/// non-positive.
#[must_use]
pub fn expected_move(
    stock_price: f64,
    atm_iv: f64,
    dte: i64,
    std_deviations: f64,
) -> Option<ExpectedMove> {
    if dte <= 0 || atm_iv <= 0.0 || stock_price <= 0.0 {
        return None;
    }

    let t = dte as f64 / DAYS_PER_YEAR;
    let move_dollars = stock_price * atm_iv * t.sqrt() * std_deviations;

    Some(ExpectedMove {
        move_dollars,
        move_percent: move_dollars / stock_price * 100.0,
        upper_bound: stock_price + move_dollars,
        lower_bound: stock_price - move_dollars,
        probability_pct: containment_probability(std_deviations),
        std_deviations,
    })
}

/// Implied volatility of the quote whose strike is nearest the stock
/// price.
///
/// Returns `None` for an empty chain or when the nearest strike carries no
/// usable volatility.
#[must_use]
pub fn atm_iv(quotes: &[OptionQuote], stock_price: f64) -> Option<f64> {
    let nearest = quotes.iter().min_by(|a, b| {
        let da = (a.strike_f64() - stock_price).abs();
        let db = (b.strike_f64() - stock_price).abs();
        da.total_cmp(&db)
    })?;

    match nearest.implied_volatility {
        Some(iv) if iv > 0.0 => Some(iv),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::DEFAULT_RISK_FREE_RATE;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal_macros::dec;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn quote_with_strike(strike: f64, iv: Option<f64>) -> OptionQuote {
        OptionQuote {
            strike: Decimal::from_f64(strike).unwrap(),
            expiration: NaiveDate::from_ymd_opt(2026, 9, 18).unwrap(),
            side: OptionSide::Put,
            bid: dec!(1.00),
            ask: dec!(1.10),
            last: dec!(1.05),
            volume: 100,
            open_interest: 1000,
            implied_volatility: iv,
        }
    }

    #[test]
    fn test_norm_cdf() {
        assert!(approx_eq(norm_cdf(0.0), 0.5, 1e-6));
        assert!(approx_eq(norm_cdf(1.96), 0.975, 0.001));
        assert!(approx_eq(norm_cdf(-1.96), 0.025, 0.001));
    }

    #[test]
    fn test_pop_otm_put_above_half() {
        // OTM put: strike below spot, seller favored.
        let pop =
            probability_of_profit(100.0, 90.0, 30, 0.30, OptionSide::Put, DEFAULT_RISK_FREE_RATE)
                .unwrap();
        assert!(pop > 50.0, "OTM put PoP should exceed 50%, got {pop}");
        assert!(pop < 100.0);
    }

    #[test]
    fn test_pop_invalid_inputs_return_none() {
        let r = DEFAULT_RISK_FREE_RATE;
        assert!(probability_of_profit(100.0, 90.0, 0, 0.30, OptionSide::Put, r).is_none());
        assert!(probability_of_profit(100.0, 90.0, -5, 0.30, OptionSide::Put, r).is_none());
        assert!(probability_of_profit(100.0, 90.0, 30, 0.0, OptionSide::Put, r).is_none());
        assert!(probability_of_profit(0.0, 90.0, 30, 0.30, OptionSide::Put, r).is_none());
        assert!(probability_of_profit(100.0, 0.0, 30, 0.30, OptionSide::Call, r).is_none());
    }

    #[test]
    fn test_put_call_complementarity() {
        // Phi(d2) + Phi(-d2) = 1, so seller PoPs sum to 100.
        let put =
            probability_of_profit(100.0, 95.0, 45, 0.25, OptionSide::Put, DEFAULT_RISK_FREE_RATE)
                .unwrap();
        let call =
            probability_of_profit(100.0, 95.0, 45, 0.25, OptionSide::Call, DEFAULT_RISK_FREE_RATE)
                .unwrap();
        assert!(approx_eq(put + call, 100.0, 1e-9));
    }

    proptest! {
        #[test]
        fn prop_put_call_complementarity(
            s in 1.0f64..1000.0,
            k in 1.0f64..1000.0,
            dte in 1i64..730,
            iv in 0.01f64..3.0,
        ) {
            let put = probability_of_profit(s, k, dte, iv, OptionSide::Put, 0.05).unwrap();
            let call = probability_of_profit(s, k, dte, iv, OptionSide::Call, 0.05).unwrap();
            prop_assert!((put + call - 100.0).abs() < 1e-6);
        }

        #[test]
        fn prop_invalid_inputs_never_panic(
            s in -10.0f64..10.0,
            k in -10.0f64..10.0,
            dte in -30i64..30,
            iv in -1.0f64..1.0,
        ) {
            let result = probability_of_profit(s, k, dte, iv, OptionSide::Put, 0.05);
            if dte <= 0 || iv <= 0.0 || s <= 0.0 || k <= 0.0 {
                prop_assert!(result.is_none());
            }
        }
    }

    #[test]
    fn test_expected_move_one_sigma() {
        let m = expected_move(100.0, 0.25, 365, 1.0).unwrap();
        // One year at 25% IV: one-sigma move is $25.
        assert!(approx_eq(m.move_dollars, 25.0, 1e-9));
        assert!(approx_eq(m.move_percent, 25.0, 1e-9));
        assert!(approx_eq(m.upper_bound, 125.0, 1e-9));
        assert!(approx_eq(m.lower_bound, 75.0, 1e-9));
        assert!(approx_eq(m.probability_pct, 68.27, 1e-9));
    }

    #[test]
    fn test_expected_move_uncommon_multiplier() {
        let m = expected_move(100.0, 0.25, 30, 1.25).unwrap();
        // Not in the lookup table: computed from the normal CDF.
        let expected = (norm_cdf(1.25) - norm_cdf(-1.25)) * 100.0;
        assert!(approx_eq(m.probability_pct, expected, 1e-9));
    }

    #[test]
    fn test_expected_move_invalid() {
        assert!(expected_move(100.0, 0.25, 0, 1.0).is_none());
        assert!(expected_move(100.0, 0.0, 30, 1.0).is_none());
        assert!(expected_move(0.0, 0.25, 30, 1.0).is_none());
    }

    #[test]
    fn test_atm_iv_picks_nearest_strike() {
        let chain = vec![
            quote_with_strike(90.0, Some(0.40)),
            quote_with_strike(100.0, Some(0.30)),
            quote_with_strike(110.0, Some(0.35)),
        ];
        assert_eq!(atm_iv(&chain, 101.0), Some(0.30));
    }

    #[test]
    fn test_atm_iv_empty_or_missing() {
        assert!(atm_iv(&[], 100.0).is_none());

        let chain = vec![quote_with_strike(100.0, None)];
        assert!(atm_iv(&chain, 100.0).is_none());
    }

    #[test]
    fn test_delta_from_pop() {
        assert!(approx_eq(delta_from_pop(70.0, OptionSide::Put), -0.30, 1e-9));
        assert!(approx_eq(delta_from_pop(70.0, OptionSide::Call), 0.70, 1e-9));
    }
}
