//! Driven port for customer persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::customer::Customer;

/// Errors surfaced by the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The underlying store failed.
    #[error("customer store failed: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Port for storing and querying customer records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// List every customer.
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Find a customer by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError>;

    /// Find a customer by exact display name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError>;

    /// Find a customer by postal code.
    async fn find_by_cep(&self, cep: &str) -> Result<Option<Customer>, RepositoryError>;

    /// Insert a new customer record.
    async fn insert(&self, customer: Customer) -> Result<(), RepositoryError>;

    /// Replace an existing record. Returns `false` when no record matched.
    async fn update(&self, customer: Customer) -> Result<bool, RepositoryError>;

    /// Remove a record. Returns `false` when no record matched.
    async fn remove(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
