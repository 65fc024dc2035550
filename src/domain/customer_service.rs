//! Customer application service.
//!
//! Joins the persistence port with the address lookup port so HTTP handlers
//! deal in one error type and never touch either adapter directly.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use super::customer::{Customer, CustomerAddress, NewCustomer};
use super::ports::{AddressSource, AddressSourceError, CustomerRepository, RepositoryError};

/// Failures surfaced by [`CustomerService`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerServiceError {
    /// No customer matched the requested identifier or name.
    #[error("customer not found")]
    NotFound,
    /// The submitted payload failed validation.
    #[error("invalid customer: {message}")]
    InvalidInput { message: String },
    /// Another customer is already registered with this postal code.
    #[error("a customer with postal code {cep} already exists")]
    DuplicateCep { cep: String },
    /// Address lookup failed terminally.
    #[error(transparent)]
    Lookup(#[from] AddressSourceError),
    /// The persistence adapter failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CustomerServiceError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Application service over customers and their addresses.
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    lookup: Arc<dyn AddressSource>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>, lookup: Arc<dyn AddressSource>) -> Self {
        Self { repository, lookup }
    }

    /// List every customer joined with its resolved address.
    #[instrument(skip(self))]
    pub async fn list_with_addresses(&self) -> Result<Vec<CustomerAddress>, CustomerServiceError> {
        let customers = self.repository.list().await?;
        let mut joined = Vec::with_capacity(customers.len());
        for customer in customers {
            let address = self.lookup.address_by_cep(&customer.cep).await?;
            joined.push(CustomerAddress::join(customer, address));
        }
        Ok(joined)
    }

    /// Fetch one customer by identifier, joined with its address.
    #[instrument(skip(self))]
    pub async fn address_by_id(&self, id: Uuid) -> Result<CustomerAddress, CustomerServiceError> {
        let customer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CustomerServiceError::NotFound)?;
        self.join_address(customer).await
    }

    /// Fetch one customer by display name, joined with its address.
    #[instrument(skip(self))]
    pub async fn address_by_name(
        &self,
        name: &str,
    ) -> Result<CustomerAddress, CustomerServiceError> {
        let customer = self
            .repository
            .find_by_name(name)
            .await?
            .ok_or(CustomerServiceError::NotFound)?;
        self.join_address(customer).await
    }

    /// Create a customer. Rejects blank fields and duplicate postal codes.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: NewCustomer) -> Result<Customer, CustomerServiceError> {
        let payload = validate(payload)?;
        if self.repository.find_by_cep(&payload.cep).await?.is_some() {
            return Err(CustomerServiceError::DuplicateCep { cep: payload.cep });
        }

        let customer = Customer {
            id: Uuid::new_v4(),
            name: payload.name,
            cep: payload.cep,
        };
        self.repository.insert(customer.clone()).await?;
        Ok(customer)
    }

    /// Replace an existing customer record.
    #[instrument(skip(self, payload))]
    pub async fn update(
        &self,
        id: Uuid,
        payload: NewCustomer,
    ) -> Result<(), CustomerServiceError> {
        let payload = validate(payload)?;
        if let Some(existing) = self.repository.find_by_cep(&payload.cep).await? {
            if existing.id != id {
                return Err(CustomerServiceError::DuplicateCep { cep: payload.cep });
            }
        }

        let replaced = self
            .repository
            .update(Customer {
                id,
                name: payload.name,
                cep: payload.cep,
            })
            .await?;
        if replaced {
            Ok(())
        } else {
            Err(CustomerServiceError::NotFound)
        }
    }

    /// Remove a customer record.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), CustomerServiceError> {
        if self.repository.remove(id).await? {
            Ok(())
        } else {
            Err(CustomerServiceError::NotFound)
        }
    }

    async fn join_address(
        &self,
        customer: Customer,
    ) -> Result<CustomerAddress, CustomerServiceError> {
        let address = self.lookup.address_by_cep(&customer.cep).await?;
        Ok(CustomerAddress::join(customer, address))
    }
}

fn validate(payload: NewCustomer) -> Result<NewCustomer, CustomerServiceError> {
    let name = payload.name.trim().to_owned();
    let cep = payload.cep.trim().to_owned();
    if name.is_empty() {
        return Err(CustomerServiceError::invalid("name must not be empty"));
    }
    if cep.is_empty() {
        return Err(CustomerServiceError::invalid("cep must not be empty"));
    }
    if !cep.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(CustomerServiceError::invalid("cep must contain digits only"));
    }
    Ok(NewCustomer { name, cep })
}
