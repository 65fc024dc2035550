//! Domain types and driven ports.
//!
//! The domain owns the lookup and persistence contracts so HTTP adapters
//! stay substitutable in tests.

pub mod address;
pub mod customer;
pub mod customer_service;
pub mod ports;

pub use address::Address;
pub use customer::{Customer, CustomerAddress, NewCustomer};
pub use customer_service::{CustomerService, CustomerServiceError};
