//! Circuit breaker shared across all callers of one downstream dependency.
//!
//! Timekeeping uses `tokio::time::Instant` so the transition table can be
//! exercised under a paused test clock, independent of real network timing.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Circuit state observed before each network attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation; calls go through.
    Closed,
    /// Failing fast; no call is attempted until the break elapses.
    Open,
    /// Probing; one call goes through and its outcome decides the state.
    HalfOpen,
}

/// Thresholds and timers for the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive handled failures before the circuit opens.
    pub failure_threshold: u32,
    /// How long the circuit stays open before a half-open probe.
    pub break_duration: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            break_duration: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct CircuitInner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Mutex-guarded three-state circuit breaker.
///
/// All transitions happen under one lock so concurrent callers observe a
/// single authoritative state: once the break elapses exactly one sequence
/// of `observe` / `record_*` calls decides whether the circuit closes or
/// reopens.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<CircuitInner>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(CircuitInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    /// Observe the current state, transitioning `Open` to `HalfOpen` once
    /// the break duration has elapsed.
    ///
    /// Callers must not issue a network call when this returns
    /// [`CircuitState::Open`].
    pub fn observe(&self) -> CircuitState {
        let mut inner = self.lock();
        if inner.state == CircuitState::Open {
            let elapsed = inner
                .opened_at
                .map(|opened_at| opened_at.elapsed() >= self.config.break_duration)
                .unwrap_or(false);
            if elapsed {
                inner.state = CircuitState::HalfOpen;
                inner.opened_at = None;
            }
        }
        inner.state
    }

    /// Record a successful call: closes the circuit and resets the counter.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    /// Record a handled failure.
    ///
    /// Opens the circuit when the failure count reaches the threshold, or
    /// immediately when a half-open probe fails.
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        if inner.state == CircuitState::HalfOpen
            || inner.consecutive_failures >= self.config.failure_threshold
        {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(Instant::now());
        }
    }

    /// Consecutive handled failures recorded since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CircuitInner> {
        // A poisoned lock means a panic while holding it; the state is a
        // plain value and remains usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
