//! HTTP implementation of the upstream contacts API

use super::types::{AggregatedPage, ContactsApi};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::parse_headers;
use crate::types::UpstreamContact;
use async_trait::async_trait;
use tracing::debug;

/// Path of the contacts collection on the upstream API
pub const CONTACTS_ENDPOINT: &str = "/api/v1/contacts";
/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Upstream client issuing one retried GET per page
#[derive(Debug)]
pub struct UpstreamClient {
    http: HttpClient,
}

impl UpstreamClient {
    /// Create a client from HTTP configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_config(config)?,
        })
    }

    /// One attempt: send, check status, read headers, decode body
    async fn fetch_once(&self, page: u32) -> Result<AggregatedPage> {
        let response = self
            .http
            .get(CONTACTS_ENDPOINT, &[(PAGE_PARAM, page.to_string())])
            .await?;

        let cursor = parse_headers(response.headers());
        let body = response.bytes().await?;
        let contacts = decode_contacts(&body)?;

        Ok(AggregatedPage { contacts, cursor })
    }
}

#[async_trait]
impl ContactsApi for UpstreamClient {
    async fn fetch_page(&self, page: u32) -> Result<AggregatedPage> {
        debug!("Fetching contacts page: {}", page);

        let label = format!("Contacts page {page}");
        let result = self
            .http
            .retry(&label, move |_| self.fetch_once(page))
            .await
            .map_err(|e| Error::upstream(page, e))?;

        debug!(
            "Successfully fetched page {}: {} contacts",
            page,
            result.contacts.len()
        );
        Ok(result)
    }
}

/// Decode a page body; a JSON `null` or empty body counts as an empty page
fn decode_contacts(body: &[u8]) -> Result<Vec<Option<UpstreamContact>>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let contacts: Option<Vec<Option<UpstreamContact>>> = serde_json::from_slice(body)
        .map_err(|e| Error::decode(format!("Invalid contacts body: {e}")))?;
    Ok(contacts.unwrap_or_default())
}
