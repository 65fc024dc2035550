//! Retry policy with exponential backoff and jitter.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Upper bound (exclusive) of the random jitter added to each backoff delay.
const JITTER_MILLIS: u64 = 100;

/// Per-call retry budget and backoff schedule.
///
/// The policy itself is immutable; attempt accounting lives on the caller's
/// stack for the duration of one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl RetryPolicy {
    /// Build a policy allowing `max_attempts` total attempts (minimum 1).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Total attempts allowed for one logical call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Minimum delay before retry `retry` (1-indexed): `2^retry` seconds.
    pub fn backoff_floor(retry: u32) -> Duration {
        Duration::from_secs(1u64 << retry.min(62))
    }

    /// Delay before retry `retry` (1-indexed): the floor plus a random
    /// jitter in `[0, 100)` ms so concurrent callers do not retry in step.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let jitter = SmallRng::from_entropy().gen_range(0..JITTER_MILLIS);
        Self::backoff_floor(retry) + Duration::from_millis(jitter)
    }
}
