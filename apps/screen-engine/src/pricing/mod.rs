//! Pricing & probability library.
//!
//! Pure, side-effect-free functions over (stock price, strike, days to
//! expiration, implied volatility). Every function soft-fails: non-positive
//! prices, strikes, volatilities, or DTE yield `None` instead of an error,
//! so a batch scan is never interrupted by one bad contract.
//!
//! All math is `f64`; callers holding `Decimal` quote fields convert at
//! this boundary.

mod probability;
mod returns;
mod volatility;

pub use probability::{
    ExpectedMove, atm_iv, delta_from_pop, expected_move, probability_of_profit,
};
pub use returns::{annualized_return, annualized_return_with_assignment, break_even};
pub use volatility::{historical_volatility, iv_percentile, iv_rank};

/// Default annualized risk-free rate used by the probability model.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// Days in the annualization year.
pub(crate) const DAYS_PER_YEAR: f64 = 365.0;
