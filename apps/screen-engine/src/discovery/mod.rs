//! Structural discovery signals, the composite score, and auxiliary
//! candidate scoring.
//!
//! The four structural checks and the cap/coverage bonuses feed the 0-100
//! discovery score. Quality, IV/HV, insider, and news scoring are merged
//! into the candidate record for ranking rationale but never re-enter the
//! composite formula.

mod news;
mod quality;
mod score;
mod sentiment;
mod signals;

pub use news::{NewsAnalysis, analyze_news};
pub use quality::{iv_hv_interpretation, iv_hv_ratio, quality_score};
pub use score::{analyst_coverage_bonus, discovery_score, market_cap_bonus};
pub use sentiment::{InsiderRead, insider_sentiment};
pub use signals::{StructuralThresholds, detect_structural_signals, discovery_reasons};
