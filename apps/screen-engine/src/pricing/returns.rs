//! Premium-return arithmetic for short option positions.

use crate::models::OptionSide;

use super::DAYS_PER_YEAR;

/// Break-even price for a short option: strike less premium for a put,
/// strike plus premium for a call.
#[must_use]
pub fn break_even(strike: f64, premium: f64, side: OptionSide) -> f64 {
    match side {
        OptionSide::Put => strike - premium,
        OptionSide::Call => strike + premium,
    }
}

/// Annualized return on collateral for a short option, percent.
///
/// `(premium / strike) · (365 / dte) · 100`. A non-positive DTE reads as
/// zero rather than a division error.
#[must_use]
pub fn annualized_return(premium: f64, strike: f64, dte: i64) -> f64 {
    if dte <= 0 || strike <= 0.0 {
        return 0.0;
    }

    (premium / strike) * (DAYS_PER_YEAR / dte as f64) * 100.0
}

/// Annualized return including the flat premium yield kept if assigned.
///
/// The assignment leg `(premium / strike) · 100` is not annualized; it is
/// the cushion on the cost basis at assignment.
#[must_use]
pub fn annualized_return_with_assignment(premium: f64, strike: f64, dte: i64) -> f64 {
    if strike <= 0.0 {
        return 0.0;
    }

    annualized_return(premium, strike, dte) + (premium / strike) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn break_even_put_and_call() {
        assert!(approx_eq(break_even(100.0, 2.50, OptionSide::Put), 97.50, 1e-9));
        assert!(approx_eq(break_even(100.0, 2.50, OptionSide::Call), 102.50, 1e-9));
    }

    #[test]
    fn annualized_return_basic() {
        // $2.50 on a $100 strike over 36.5 days: 2.5% * 10 = 25%.
        let r = annualized_return(2.50, 100.0, 36);
        assert!(r > 25.0 && r < 26.0, "got {r}");
    }

    #[test]
    fn annualized_return_zero_dte_is_zero() {
        assert_eq!(annualized_return(2.50, 100.0, 0), 0.0);
        assert_eq!(annualized_return(2.50, 100.0, -3), 0.0);
        assert_eq!(annualized_return(2.50, 0.0, 30), 0.0);
    }

    #[test]
    fn assignment_adds_flat_premium_yield() {
        let base = annualized_return(2.50, 100.0, 30);
        let with = annualized_return_with_assignment(2.50, 100.0, 30);
        assert!(approx_eq(with - base, 2.5, 1e-9));
    }
}
