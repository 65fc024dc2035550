//! ViaCEP outbound adapter.
//!
//! Thin HTTP implementation of the `AddressSource` port. Retry and
//! circuit-breaking live in `crate::resilience`, not here.

mod dto;
mod http_source;

pub use http_source::ViaCepHttpSource;
