//! Outbound adapters for the domain ports.

pub mod memory;
pub mod viacep;

pub use memory::InMemoryCustomerRepository;
pub use viacep::ViaCepHttpSource;
