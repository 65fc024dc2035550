//! Resolved postal address.

use serde::{Deserialize, Serialize};

/// Address resolved for a postal code by the lookup service.
///
/// Immutable once constructed; produced by decoding the remote response and
/// discarded after use. Field names follow the API's JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Postal code the lookup resolved, as returned by the remote service.
    pub cep: String,
    /// Street name.
    pub street: String,
    /// Neighborhood.
    pub neighborhood: String,
    /// City name.
    pub city: String,
    /// Two-letter state code.
    pub state: String,
}
