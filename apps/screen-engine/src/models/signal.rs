//! Flow and structural signal records.

use serde::{Deserialize, Serialize};

/// Severity of an actionable flow signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational, no action required.
    Low,
    /// Worth watching before entering a position.
    Medium,
    /// Strong reason to change behavior.
    High,
}

/// Tone of a flow signal: whether it warns, informs, or clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowSignalKind {
    /// Bearish or risk-raising observation.
    Warning,
    /// Neutral observation with trade implications.
    Info,
    /// Favorable or all-clear observation.
    Success,
}

/// An actionable, human-readable signal produced by the signal generator.
///
/// Signals are immutable once produced; the generator guarantees at least
/// one signal per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSignal {
    /// Signal tone.
    pub kind: FlowSignalKind,
    /// Severity ranking.
    pub severity: Severity,
    /// Short headline.
    pub title: String,
    /// What was observed.
    pub message: String,
    /// What the wheel seller should do about it.
    pub recommendation: String,
    /// Supporting detail.
    pub details: String,
}

/// Strength classification for a structural discovery signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    /// Barely above threshold.
    Low,
    /// Clearly elevated.
    Medium,
    /// Well above normal.
    High,
    /// Multiples above normal.
    Extreme,
}

/// Kind of structural signal feeding the composite discovery score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralSignalKind {
    /// Chain volume well above open interest.
    UnusualVolume,
    /// Implied volatility high versus its own history.
    IvSurge,
    /// Large outstanding open interest.
    OiConcentration,
    /// Put/call ratio at a sentiment extreme.
    PcrExtreme,
}

/// A structural discovery signal with its contribution to the composite
/// score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralSignal {
    /// Which structural check fired.
    pub kind: StructuralSignalKind,
    /// Strength classification.
    pub strength: SignalStrength,
    /// Score contribution in [0, 100].
    pub score: f64,
    /// Human-readable supporting detail.
    pub details: String,
}
