//! Core data models for the screening engine.
//!
//! Records are typed with explicit nullable fields: a missing implied
//! volatility or an undefined volume/open-interest ratio is an `Option`,
//! never an absent key or a NaN smuggled through arithmetic.

mod candidate;
mod quote;
mod scan;
mod signal;

pub use candidate::{
    Fundamentals, GemCandidate, InsiderActivity, InsiderSentiment, NewsItem, NewsSentiment,
};
pub use quote::{OptionChainSnapshot, OptionQuote, OptionSide, TickerOverview};
pub use scan::{Universe, UniverseName, UniverseScanRequest, UniverseScanResult};
pub use signal::{FlowSignal, FlowSignalKind, Severity, SignalStrength, StructuralSignal, StructuralSignalKind};
