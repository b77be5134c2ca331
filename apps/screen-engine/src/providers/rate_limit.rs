//! Explicit request pacing toward external providers.
//!
//! The limiter is an injected object, not ambient process state, so tests
//! can construct a permissive one deterministically.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding-window rate limiter.
///
/// At most `max_requests` acquisitions per `window`; callers over the
/// budget wait, they are never rejected.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Limiter allowing `max_requests` per `window`.
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Limiter that never throttles, for tests.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX, Duration::from_secs(1))
    }

    /// Wait until a request slot is available, then consume it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut timestamps = self.timestamps.lock().await;
                let now = Instant::now();

                while let Some(&front) = timestamps.front() {
                    if now.duration_since(front) >= self.window {
                        timestamps.pop_front();
                    } else {
                        break;
                    }
                }

                if timestamps.len() < self.max_requests {
                    timestamps.push_back(now);
                    None
                } else {
                    // Oldest entry ages out of the window first.
                    timestamps
                        .front()
                        .map(|&front| self.window - now.duration_since(front))
                }
            };

            match wait {
                None => return,
                Some(delay) => tokio::time::sleep(delay).await,
            }
        }
    }
}
