//! Single-entry read-through cache for the aggregate

use super::aggregator::Aggregator;
use super::types::{CacheConfig, CacheEntry};
use crate::error::{Error, Result};
use moka::future::Cache;
use std::sync::Arc;
use tracing::info;

/// The one logical key under which the aggregate is stored
pub const ALL_CONTACTS_KEY: &str = "all";

/// Read-through cache around an [`Aggregator`]
///
/// Concurrent misses coalesce onto a single `fetch_all`; every waiter
/// receives that computation's result. Failures are never stored.
pub struct AggregateCache {
    aggregator: Aggregator,
    cache: Option<Cache<&'static str, Arc<CacheEntry>>>,
    config: CacheConfig,
}

impl AggregateCache {
    /// Create a cache for the given aggregator
    pub fn new(aggregator: Aggregator, config: CacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            Cache::builder()
                .name("contacts")
                .max_capacity(config.max_capacity.max(1))
                .time_to_live(config.ttl)
                .build()
        });

        Self {
            aggregator,
            cache,
            config,
        }
    }

    /// Return the live entry, computing it on a miss
    pub async fn get_or_compute(&self) -> Result<Arc<CacheEntry>> {
        let Some(cache) = &self.cache else {
            return self.compute().await;
        };

        cache
            .try_get_with(ALL_CONTACTS_KEY, self.compute())
            .await
            .map_err(Error::from_shared)
    }

    /// Drop the current entry; the next read recomputes
    pub async fn evict(&self) {
        info!("Evicting contacts cache");
        if let Some(cache) = &self.cache {
            cache.invalidate(ALL_CONTACTS_KEY).await;
        }
    }

    /// The live entry, if any, without computing
    pub async fn peek(&self) -> Option<Arc<CacheEntry>> {
        match &self.cache {
            Some(cache) => cache.get(ALL_CONTACTS_KEY).await,
            None => None,
        }
    }

    /// Get the underlying aggregator
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    async fn compute(&self) -> Result<Arc<CacheEntry>> {
        info!("Cache miss - fetching all contacts from upstream");
        let contacts = self.aggregator.fetch_all().await?;
        let entry = CacheEntry::new(contacts);
        info!(
            "Cached {} contacts at {}",
            entry.len(),
            entry.created_at().to_rfc3339()
        );
        Ok(Arc::new(entry))
    }
}

impl std::fmt::Debug for AggregateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateCache")
            .field("config", &self.config)
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}
