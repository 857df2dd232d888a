//! Aggregation module
//!
//! Collects every upstream page into one ordered contact list and keeps that
//! list in a single-entry, time-bounded cache.
//!
//! # Overview
//!
//! - [`Aggregator`] drives the sequential page loop and maps upstream records
//! - [`AggregateCache`] serves the aggregate read-through, coalescing
//!   concurrent misses onto one computation

mod aggregator;
mod cache;
mod types;

pub use aggregator::{map_contact, Aggregator};
pub use cache::{AggregateCache, ALL_CONTACTS_KEY};
pub use types::{AggregationOptions, CacheConfig, CacheEntry};

#[cfg(test)]
mod tests;
