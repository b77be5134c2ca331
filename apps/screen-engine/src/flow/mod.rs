//! Flow anomaly detection and signal generation.
//!
//! The detector derives volume/open-interest ratios, dollar premium flow,
//! and per-expiration put/call ratios from a raw chain; the signal
//! generator turns the aggregates into an ordered, never-empty list of
//! actionable signals.

mod detector;
mod signals;

pub use detector::{
    ContractFlow, ExpirationRatio, FlowStats, FlowThresholds, TopStrikes, UnusualActivity,
    detect_unusual_activity, premium_flow, put_call_ratio_by_expiration, top_unusual_strikes,
    volume_to_oi,
};
pub use signals::generate_wheel_signals;
