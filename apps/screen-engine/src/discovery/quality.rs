//! Fundamental quality scoring and the IV/HV auxiliary metric.

use crate::models::Fundamentals;

/// Composite fundamental quality score in [0, 100].
///
/// Point table: ROE up to 20 (30% ROE is perfect), positive free cash flow
/// 15, insider ownership up to 15 (20% is perfect), profit margin up to 15
/// (20% is perfect), institutional ownership up to 10 (80% is perfect).
/// Penalties: up to -20 when debt/equity exceeds 100, up to -10 when short
/// interest exceeds 15% of float.
#[must_use]
pub fn quality_score(fundamentals: &Fundamentals) -> f64 {
    let roe_score = if fundamentals.roe_pct > 0.0 {
        (fundamentals.roe_pct / 30.0 * 20.0).min(20.0)
    } else {
        0.0
    };
    let fcf_score = if fundamentals.free_cash_flow_b > 0.0 { 15.0 } else { 0.0 };
    let insider_score = (fundamentals.insider_ownership_pct / 20.0 * 15.0).clamp(0.0, 15.0);
    let margin_score = (fundamentals.profit_margin_pct / 20.0 * 15.0).clamp(0.0, 15.0);
    let institutional_score =
        (fundamentals.institutional_ownership_pct / 80.0 * 10.0).clamp(0.0, 10.0);

    let debt_penalty = if fundamentals.debt_to_equity > 100.0 {
        -(fundamentals.debt_to_equity / 200.0 * 20.0).min(20.0)
    } else {
        0.0
    };
    let short_penalty = if fundamentals.short_interest_pct > 15.0 {
        -(fundamentals.short_interest_pct / 30.0 * 10.0).min(10.0)
    } else {
        0.0
    };

    (roe_score + fcf_score + insider_score + margin_score + institutional_score
        + debt_penalty
        + short_penalty)
        .clamp(0.0, 100.0)
}

/// IV over 30-day historical volatility, zero when HV is unusable.
#[must_use]
pub fn iv_hv_ratio(implied_volatility_pct: f64, hv_30d_pct: f64) -> f64 {
    if hv_30d_pct > 0.0 {
        implied_volatility_pct / hv_30d_pct
    } else {
        0.0
    }
}

/// Plain-language reading of the IV/HV ratio for a premium seller.
#[must_use]
pub fn iv_hv_interpretation(ratio: f64) -> &'static str {
    if ratio > 1.5 {
        "SELL PREMIUM - IV elevated vs realized vol"
    } else if ratio > 1.0 {
        "MODERATE - Fair pricing"
    } else if ratio > 0.0 {
        "BUY PREMIUM - IV compressed"
    } else {
        "INSUFFICIENT DATA"
    }
}
