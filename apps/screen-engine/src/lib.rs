// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::field_reassign_with_default
    )
)]

//! Screen Engine - Rust Core Library
//!
//! Quantitative screening and signal engine for wheel-strategy income
//! selection.
//!
//! # Architecture
//!
//! The engine is a pure-core, adapter-edge design:
//!
//! - **pricing**: side-effect-free probability and volatility math
//!   (seller probability of profit, expected move, IV percentile/rank,
//!   annualized premium returns)
//! - **flow**: rule-based unusual options activity detection and the
//!   wheel-seller signal cascade
//! - **discovery**: structural signal battery, composite discovery
//!   scoring, and auxiliary research scoring (quality, insider, news
//!   catalysts)
//! - **scanner**: the two-phase universe scan over a bounded worker pool
//! - **providers**: the market-data and research boundary (tiered
//!   live/delayed HTTP adapters, rate limiting, retry)
//! - **events**: write-only flow-event sink for downstream persistence
//!
//! The core modules take plain data in and return plain data out; all I/O
//! lives behind the `providers` and `events` traits, so the full pipeline
//! runs deterministically against in-memory fixtures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Structural signal detection and composite discovery scoring.
pub mod discovery;

/// Scan-level error types.
pub mod error;

/// Flow-event sink boundary.
pub mod events;

/// Unusual options activity detection and wheel signals.
pub mod flow;

/// Core data models.
pub mod models;

/// Pure pricing and probability math.
pub mod pricing;

/// Market-data and research provider boundary.
pub mod providers;

/// Universe scanning.
pub mod scanner;

/// Tracing setup.
pub mod telemetry;

pub use config::{Config, ConfigError, load_config};
pub use error::ScanError;
pub use events::{FlowEvent, FlowEventSink, MemoryFlowEventSink, NullFlowEventSink};
pub use models::{
    FlowSignal, GemCandidate, OptionChainSnapshot, OptionQuote, OptionSide, StructuralSignal,
    TickerOverview, Universe, UniverseName, UniverseScanRequest, UniverseScanResult,
};
pub use providers::{
    BrokerageHttpProvider, DelayedHttpProvider, MarketDataProvider, ProviderError, RateLimiter,
    ResearchProvider, TieredProvider,
};
pub use scanner::{ScannerSettings, UniverseScanner};
