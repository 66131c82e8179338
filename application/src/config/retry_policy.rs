//! Retry policy — attempt bound and backoff schedule for one turn.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded exponential backoff.
///
/// `max_retries` is the total number of attempts a turn may make. The wait
/// before zero-indexed attempt `k` (`k >= 1`) is `base_delay * 2^k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Wait before zero-indexed `attempt`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    /// True if zero-indexed `attempt` is within the bound.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt < self.max_retries.max(1)
    }
}
