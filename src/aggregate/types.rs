//! Aggregation and cache types

use crate::types::ContactRecord;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Options for one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationOptions {
    /// Overall bound on a full aggregation; `None` means no deadline
    pub deadline: Option<Duration>,
    /// Fail instead of stopping when a page carries no pagination headers
    pub require_cursor: bool,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// When false every read recomputes the aggregate
    pub enabled: bool,
    /// Lifetime of an entry, measured from its creation
    pub ttl: Duration,
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(300),
            max_capacity: 1,
        }
    }
}

/// The materialized aggregate
///
/// Never mutated after construction; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    contacts: Vec<ContactRecord>,
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(contacts: Vec<ContactRecord>) -> Self {
        Self {
            contacts,
            created_at: Utc::now(),
        }
    }

    /// Contacts in upstream page order
    pub fn contacts(&self) -> &[ContactRecord] {
        &self.contacts
    }

    /// When the aggregate was computed
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of contacts
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// True when the aggregate holds no contacts
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
