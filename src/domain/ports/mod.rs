//! Driven ports consumed by the application services.

pub mod address_source;
pub mod customer_repository;

pub use address_source::{AddressSource, AddressSourceError};
pub use customer_repository::{CustomerRepository, RepositoryError};

#[cfg(test)]
pub use address_source::MockAddressSource;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
