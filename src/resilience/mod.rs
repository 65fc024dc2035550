//! Retry and circuit-breaking around the address lookup port.

pub mod breaker;
pub mod retry;
pub mod source;

pub use breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::RetryPolicy;
pub use source::ResilientAddressSource;
