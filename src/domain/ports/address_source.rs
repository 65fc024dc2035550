//! Driven port for resolving a postal code to an address.

use async_trait::async_trait;

use crate::domain::address::Address;

/// Errors surfaced while resolving an address.
///
/// `Status` covers every non-200 response. That is deliberately broad: the
/// lookup service reports unknown postal codes with non-200 statuses too,
/// and callers rely on those being handled as transient outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressSourceError {
    /// Network transport failed before a response arrived.
    #[error("lookup transport failed: {message}")]
    Transport { message: String },
    /// The lookup service answered with a non-200 status.
    #[error("lookup returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// A 200 response body could not be decoded.
    #[error("lookup response decode failed: {message}")]
    Decode { message: String },
    /// The circuit to the lookup service is open; no call was attempted.
    #[error("lookup circuit is open; request not attempted")]
    CircuitOpen,
    /// Every attempt failed and the retry budget is spent.
    #[error("lookup failed after {attempts} attempts: {cause}")]
    Exhausted {
        attempts: u32,
        cause: Box<AddressSourceError>,
    },
}

impl AddressSourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn exhausted(attempts: u32, cause: AddressSourceError) -> Self {
        Self::Exhausted {
            attempts,
            cause: Box::new(cause),
        }
    }

    /// Return whether retrying this failure is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

/// Port for resolving one postal code to an [`Address`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Resolve the address registered for `cep`.
    ///
    /// The postal code is forwarded as-is; format validation is the remote
    /// service's concern.
    async fn address_by_cep(&self, cep: &str) -> Result<Address, AddressSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::transport(AddressSourceError::transport("connection reset"), true)]
    #[case::server_error(AddressSourceError::status(500, "boom"), true)]
    #[case::not_found(AddressSourceError::status(404, "no such cep"), true)]
    #[case::decode(AddressSourceError::decode("bad json"), false)]
    #[case::circuit_open(AddressSourceError::CircuitOpen, false)]
    fn classifies_retryable_failures(#[case] error: AddressSourceError, #[case] retryable: bool) {
        assert_eq!(error.is_retryable(), retryable);
    }

    #[test]
    fn exhausted_reports_attempts_and_cause() {
        let error = AddressSourceError::exhausted(3, AddressSourceError::status(503, "unavailable"));
        assert_eq!(
            error.to_string(),
            "lookup failed after 3 attempts: lookup returned status 503: unavailable"
        );
        assert!(!error.is_retryable());
    }
}
