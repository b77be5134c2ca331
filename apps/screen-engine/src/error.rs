//! Error taxonomy for the screening engine.
//!
//! Three failure classes, handled at three different places:
//!
//! - **Invalid pricing input** never raises at all: the pure functions in
//!   [`crate::pricing`] return `None` so a batch scan is never interrupted
//!   by one bad row.
//! - **Provider failures** ([`crate::providers::ProviderError`]) are caught
//!   at the per-ticker worker boundary and recorded as exclusions.
//! - **Request misconfiguration** ([`ScanError`]) is the only error that
//!   crosses the scanner's public boundary, and it is raised before any
//!   worker is dispatched.

use thiserror::Error;

/// Fatal, user-visible scan errors.
///
/// Once a request validates, the scanner always returns a result object;
/// these errors are only produced up front.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Request parameters are out of range or inconsistent.
    #[error("invalid scan request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// The named universe preset does not exist.
    #[error("unknown universe preset: {name}")]
    UnknownUniverse {
        /// The unrecognized preset name.
        name: String,
    },
}

impl ScanError {
    /// Invalid request with a formatted message.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
