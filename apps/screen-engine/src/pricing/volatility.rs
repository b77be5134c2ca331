//! Implied-volatility percentile/rank and historical volatility.

/// Trading days used to annualize historical volatility.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Fraction of the historical IV series strictly below the current value,
/// as a percentage.
///
/// Returns `None` for an empty history.
#[must_use]
pub fn iv_percentile(current_iv: f64, history: &[f64]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }

    let lower = history.iter().filter(|iv| **iv < current_iv).count();
    Some(lower as f64 / history.len() as f64 * 100.0)
}

/// IV rank: where the current value sits in the observed min/max range,
/// as a percentage.
///
/// A flat history (`max == min`) reads as a neutral 50.
#[must_use]
pub fn iv_rank(current_iv: f64, min_iv: f64, max_iv: f64) -> f64 {
    if (max_iv - min_iv).abs() < f64::EPSILON {
        return 50.0;
    }

    (current_iv - min_iv) / (max_iv - min_iv) * 100.0
}

/// Annualized historical volatility from a daily close series, percent.
///
/// Uses the sample standard deviation of daily returns over the last
/// `window` closes, annualized by √252. Returns `None` when fewer than
/// `window + 1` closes are available.
#[must_use]
pub fn historical_volatility(closes: &[f64], window: usize) -> Option<f64> {
    if window < 2 || closes.len() < window + 1 {
        return None;
    }

    let tail = &closes[closes.len() - window - 1..];
    let returns: Vec<f64> = tail
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();

    if returns.len() < 2 {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;

    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}
