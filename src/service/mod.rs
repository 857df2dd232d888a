//! Contact listing service
//!
//! Serves the cached aggregate as a flat list or as caller-sized pages,
//! optionally filtered by source. Slicing is a pure function over the
//! materialized aggregate and never issues upstream calls itself.

mod types;

pub use types::{paginate, PageRequest, PagedResult, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::aggregate::{AggregateCache, AggregationOptions, Aggregator, CacheConfig, CacheEntry};
use crate::error::Result;
use crate::types::{ContactRecord, ContactSource};
use crate::upstream::{AggregatedPage, ContactsApi};
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for listing contacts
#[derive(Debug, Clone)]
pub struct ContactService {
    cache: Arc<AggregateCache>,
}

impl ContactService {
    /// Wire a service over an upstream API
    pub fn new(api: Arc<dyn ContactsApi>, cache: CacheConfig, options: AggregationOptions) -> Self {
        let aggregator = Aggregator::new(api).with_options(options);
        Self::with_cache(Arc::new(AggregateCache::new(aggregator, cache)))
    }

    /// Create a service over an existing cache
    pub fn with_cache(cache: Arc<AggregateCache>) -> Self {
        Self { cache }
    }

    /// Get the aggregate cache
    pub fn cache(&self) -> &AggregateCache {
        &self.cache
    }

    /// All contacts, in aggregate order, optionally restricted to one source
    pub async fn list(&self, source: Option<ContactSource>) -> Result<Vec<ContactRecord>> {
        let entry = self.cache.get_or_compute().await?;
        Ok(filter_by_source(&entry, source))
    }

    /// One page of contacts, optionally restricted to one source
    pub async fn page(
        &self,
        request: PageRequest,
        source: Option<ContactSource>,
    ) -> Result<PagedResult<ContactRecord>> {
        info!(
            "Fetching paginated contacts - page: {}, size: {}, source: {:?}",
            request.page(),
            request.size(),
            source
        );

        let contacts = self.list(source).await?;
        Ok(paginate(&contacts, request))
    }

    /// Evict the cached aggregate
    pub async fn evict(&self) {
        self.cache.evict().await;
    }

    /// Probe the first upstream page, bypassing the cache
    pub async fn check_upstream(&self) -> Result<AggregatedPage> {
        self.cache.aggregator().probe().await
    }
}

fn filter_by_source(entry: &CacheEntry, source: Option<ContactSource>) -> Vec<ContactRecord> {
    match source {
        Some(source) => {
            debug!("Filtering contacts by source: {}", source);
            entry
                .contacts()
                .iter()
                .filter(|c| c.source == source)
                .cloned()
                .collect()
        }
        None => entry.contacts().to_vec(),
    }
}
