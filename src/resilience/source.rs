//! Retrying, circuit-breaking decorator over an [`AddressSource`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::Address;
use crate::domain::ports::{AddressSource, AddressSourceError};

use super::breaker::{CircuitBreaker, CircuitState};
use super::retry::RetryPolicy;

/// Decorator adding retry and circuit-breaking to any [`AddressSource`].
///
/// Callers see a single terminal failure per logical call; whether it came
/// from an open circuit or exhausted retries stays distinguishable in the
/// error for observability.
pub struct ResilientAddressSource<S> {
    inner: S,
    policy: RetryPolicy,
    breaker: Arc<CircuitBreaker>,
}

impl<S> ResilientAddressSource<S> {
    /// Wrap `inner` with `policy` and a breaker shared across all clones of
    /// the `Arc` (one breaker per downstream dependency).
    pub fn new(inner: S, policy: RetryPolicy, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            inner,
            policy,
            breaker,
        }
    }
}

#[async_trait]
impl<S: AddressSource> AddressSource for ResilientAddressSource<S> {
    async fn address_by_cep(&self, cep: &str) -> Result<Address, AddressSourceError> {
        let max_attempts = self.policy.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if self.breaker.observe() == CircuitState::Open {
                warn!(cep, attempt, "lookup circuit open, failing fast");
                return Err(AddressSourceError::CircuitOpen);
            }

            match self.inner.address_by_cep(cep).await {
                Ok(address) => {
                    self.breaker.record_success();
                    return Ok(address);
                }
                Err(error) if error.is_retryable() => {
                    self.breaker.record_failure();
                    warn!(cep, attempt, %error, "lookup attempt failed");
                    if attempt < max_attempts {
                        let delay = self.policy.backoff_delay(attempt);
                        debug!(cep, attempt, delay_ms = delay.as_millis() as u64, "backing off");
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(error);
                }
                // Terminal failures (e.g. an undecodable 200 body) bypass
                // both the retry budget and the breaker accounting.
                Err(error) => return Err(error),
            }
        }

        Err(match last_error {
            Some(cause) => AddressSourceError::exhausted(max_attempts, cause),
            None => AddressSourceError::CircuitOpen,
        })
    }
}
