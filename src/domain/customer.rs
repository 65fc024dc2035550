//! Customer domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::Address;

/// A stored customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Stable customer identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Postal code of the customer's registered address, digits only.
    pub cep: String,
}

/// Payload accepted when creating or replacing a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Display name.
    pub name: String,
    /// Postal code of the customer's registered address, digits only.
    pub cep: String,
}

/// A customer joined with its resolved address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddress {
    /// Stable customer identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Postal code of the customer's registered address.
    pub cep: String,
    /// Address resolved through the lookup service.
    pub address: Address,
}

impl CustomerAddress {
    /// Join a customer with the address resolved for its postal code.
    pub fn join(customer: Customer, address: Address) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            cep: customer.cep,
            address,
        }
    }
}
