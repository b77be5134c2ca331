//! Write-only flow-event boundary.
//!
//! The scanner emits one event per deep-scanned ticker whose signal
//! battery fired. An external store owns schema and retention; from this
//! side the sink is fire-and-forget, and sink failures are logged, never
//! propagated into scan results.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One flow observation worth persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    /// Ticker the observation belongs to.
    pub ticker: String,
    /// Composite discovery score at observation time.
    pub discovery_score: f64,
    /// Number of distinct structural signals that fired.
    pub structural_signal_count: usize,
    /// Dollar premium across unusual puts.
    pub unusual_put_flow: f64,
    /// Dollar premium across unusual calls.
    pub unusual_call_flow: f64,
    /// Chain snapshot timestamp the observation was derived from.
    pub as_of: DateTime<Utc>,
}

/// A sink failed to accept an event.
#[derive(Debug, Error)]
#[error("flow event sink error: {message}")]
pub struct EventSinkError {
    /// What went wrong.
    pub message: String,
}

/// Write-only event sink.
#[async_trait]
pub trait FlowEventSink: Send + Sync {
    /// Accept one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventSinkError`] when the event cannot be accepted; the
    /// scanner logs and continues.
    async fn publish(&self, event: FlowEvent) -> Result<(), EventSinkError>;
}

/// Sink that drops everything. The default when no store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFlowEventSink;

#[async_trait]
impl FlowEventSink for NullFlowEventSink {
    async fn publish(&self, _event: FlowEvent) -> Result<(), EventSinkError> {
        Ok(())
    }
}

/// Sink that buffers events in memory, for tests.
#[derive(Debug, Default)]
pub struct MemoryFlowEventSink {
    events: RwLock<Vec<FlowEvent>>,
}

impl MemoryFlowEventSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far.
    #[must_use]
    pub fn events(&self) -> Vec<FlowEvent> {
        self.events.read().unwrap().clone()
    }
}

#[async_trait]
impl FlowEventSink for MemoryFlowEventSink {
    async fn publish(&self, event: FlowEvent) -> Result<(), EventSinkError> {
        self.events.write().unwrap().push(event);
        Ok(())
    }
}
