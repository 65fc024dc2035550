//! In-memory customer repository.
//!
//! Stand-in persistence adapter for the template role; a database-backed
//! adapter would implement the same port.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Customer;
use crate::domain::ports::{CustomerRepository, RepositoryError};

/// `RwLock`-guarded map of customers keyed by identifier.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    records: RwLock<HashMap<Uuid, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository pre-populated with `customers`.
    pub fn seeded(customers: impl IntoIterator<Item = Customer>) -> Self {
        let records = customers
            .into_iter()
            .map(|customer| (customer.id, customer))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let records = self.records.read().await;
        let mut listed: Vec<_> = records.values().cloned().collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(listed)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.values().find(|c| c.name == name).cloned())
    }

    async fn find_by_cep(&self, cep: &str) -> Result<Option<Customer>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.values().find(|c| c.cep == cep).cloned())
    }

    async fn insert(&self, customer: Customer) -> Result<(), RepositoryError> {
        self.records.write().await.insert(customer.id, customer);
        Ok(())
    }

    async fn update(&self, customer: Customer) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        match records.get_mut(&customer.id) {
            Some(existing) => {
                *existing = customer;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}
