//! DTO for decoding ViaCEP JSON responses.
//!
//! The adapter decodes into this transport DTO first, then maps into the
//! domain [`Address`] in one pass.

use serde::Deserialize;

use crate::domain::Address;

#[derive(Debug, Deserialize)]
pub(super) struct ViaCepResponseDto {
    pub(super) cep: String,
    #[serde(default)]
    pub(super) logradouro: String,
    #[serde(default)]
    pub(super) bairro: String,
    #[serde(default)]
    pub(super) localidade: String,
    #[serde(default)]
    pub(super) uf: String,
}

impl ViaCepResponseDto {
    pub(super) fn into_domain_address(self) -> Result<Address, String> {
        if self.cep.trim().is_empty() {
            return Err("response is missing the cep field".to_owned());
        }
        Ok(Address {
            cep: self.cep,
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}
