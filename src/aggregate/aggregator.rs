//! Sequential page loop over the upstream API

use super::types::AggregationOptions;
use crate::error::{Error, Result};
use crate::types::{ContactRecord, ContactSource, UpstreamContact};
use crate::upstream::{AggregatedPage, ContactsApi};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Map one upstream entry; a null entry maps to nothing
pub fn map_contact(contact: Option<UpstreamContact>, source: ContactSource) -> Option<ContactRecord> {
    contact.map(|c| ContactRecord::from_upstream(c, source))
}

/// Collects all upstream pages into one ordered list
#[derive(Clone)]
pub struct Aggregator {
    api: Arc<dyn ContactsApi>,
    source: ContactSource,
    options: AggregationOptions,
}

impl Aggregator {
    /// Create an aggregator tagging records with the default source
    pub fn new(api: Arc<dyn ContactsApi>) -> Self {
        Self {
            api,
            source: ContactSource::default(),
            options: AggregationOptions::default(),
        }
    }

    /// Set aggregation options
    #[must_use]
    pub fn with_options(mut self, options: AggregationOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetch every page starting at 1, in order
    ///
    /// Any page failure fails the whole run; no partial list is returned.
    pub async fn fetch_all(&self) -> Result<Vec<ContactRecord>> {
        match self.options.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.collect())
                .await
                .map_err(|_| Error::DeadlineExceeded {
                    timeout_ms: deadline.as_millis() as u64,
                })?,
            None => self.collect().await,
        }
    }

    /// Fetch only the first page, as a reachability probe
    pub async fn probe(&self) -> Result<AggregatedPage> {
        self.api.fetch_page(1).await
    }

    async fn collect(&self) -> Result<Vec<ContactRecord>> {
        let started = Instant::now();
        let mut contacts = Vec::new();
        let mut page = 1u32;

        loop {
            let result = self.api.fetch_page(page).await?;

            let before = contacts.len();
            contacts.extend(
                result
                    .contacts
                    .into_iter()
                    .filter_map(|c| map_contact(c, self.source)),
            );
            if contacts.len() > before {
                debug!("Added {} contacts from page {}", contacts.len() - before, page);
            }

            match result.cursor {
                Some(cursor) if cursor.has_next() => match page.checked_add(1) {
                    Some(next) => page = next,
                    None => break,
                },
                Some(_) => break,
                None if self.options.require_cursor => {
                    return Err(Error::MalformedCursor { page });
                }
                None => {
                    warn!(
                        "Page {} carried no pagination headers, treating it as the last page",
                        page
                    );
                    break;
                }
            }
        }

        info!(
            "Successfully fetched {} contacts from {} page(s) in {} ms",
            contacts.len(),
            page,
            started.elapsed().as_millis()
        );
        Ok(contacts)
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("source", &self.source)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
