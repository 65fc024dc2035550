//! Reqwest-backed ViaCEP source adapter.
//!
//! This adapter owns transport details only: URL construction, HTTP error
//! mapping, and JSON decoding into the domain [`Address`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::ViaCepResponseDto;
use crate::domain::Address;
use crate::domain::ports::{AddressSource, AddressSourceError};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// ViaCEP adapter performing HTTP GET requests against one base address.
pub struct ViaCepHttpSource {
    client: Client,
    base_url: Url,
}

impl ViaCepHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn lookup_url(&self, cep: &str) -> Result<Url, AddressSourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AddressSourceError::transport("lookup base URL cannot carry segments"))?
            .pop_if_empty()
            .extend([cep, "json", ""]);
        Ok(url)
    }
}

#[async_trait]
impl AddressSource for ViaCepHttpSource {
    async fn address_by_cep(&self, cep: &str) -> Result<Address, AddressSourceError> {
        let url = self.lookup_url(cep)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        // Anything other than 200 is a handled failure fed to the retry
        // policy, unknown postal codes included.
        if status != StatusCode::OK {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_address(body.as_ref())
    }
}

fn parse_address(body: &[u8]) -> Result<Address, AddressSourceError> {
    let decoded: ViaCepResponseDto = serde_json::from_slice(body).map_err(|error| {
        AddressSourceError::decode(format!("invalid ViaCEP JSON payload: {error}"))
    })?;
    decoded.into_domain_address().map_err(AddressSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> AddressSourceError {
    AddressSourceError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AddressSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        "empty body".to_owned()
    } else {
        preview
    };
    AddressSourceError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
