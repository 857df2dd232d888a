//! Tests for the aggregator and aggregate cache

use super::*;
use crate::error::{Error, Result};
use crate::pagination::PageCursor;
use crate::types::{ContactSource, UpstreamContact};
use crate::upstream::{AggregatedPage, ContactsApi};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory upstream serving fixed pages
#[derive(Default)]
struct ScriptedApi {
    pages: Vec<AggregatedPage>,
    calls: AtomicU32,
    failing: AtomicBool,
    delay: Duration,
}

impl ScriptedApi {
    fn new(pages: Vec<AggregatedPage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContactsApi for ScriptedApi {
    async fn fetch_page(&self, page: u32) -> Result<AggregatedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::upstream(page, Error::http_status(500, "")));
        }
        self.pages
            .get(page as usize - 1)
            .cloned()
            .ok_or_else(|| Error::upstream(page, Error::http_status(404, "")))
    }
}

fn contact(id: i64) -> UpstreamContact {
    UpstreamContact {
        id: Some(id),
        name: Some(format!("Contact {id}")),
        email: Some(format!("contact{id}@example.net")),
        ..Default::default()
    }
}

fn page(ids: &[i64], current: u32, total: u32) -> AggregatedPage {
    AggregatedPage::new(
        ids.iter().copied().map(contact).collect(),
        Some(PageCursor::at(current, total)),
    )
}

fn ids(records: &[crate::types::ContactRecord]) -> Vec<Option<i64>> {
    records.iter().map(|r| r.id).collect()
}

// ============================================================================
// Mapping Tests
// ============================================================================

#[test]
fn test_map_contact_tags_source() {
    let record = map_contact(Some(contact(1)), ContactSource::KenectLabs).unwrap();
    assert_eq!(record.id, Some(1));
    assert_eq!(record.email.as_deref(), Some("contact1@example.net"));
    assert_eq!(record.source, ContactSource::KenectLabs);
}

#[test]
fn test_map_null_contact_is_skipped() {
    assert_eq!(map_contact(None, ContactSource::KenectLabs), None);
}

// ============================================================================
// Aggregator Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_all_single_page() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1, 2], 1, 1)]));
    let aggregator = Aggregator::new(api.clone());

    let records = aggregator.fetch_all().await.unwrap();

    assert_eq!(ids(&records), vec![Some(1), Some(2)]);
    assert!(records.iter().all(|r| r.source == ContactSource::KenectLabs));
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_fetch_all_concatenates_pages_in_order() {
    let api = Arc::new(ScriptedApi::new(vec![
        page(&[1, 2], 1, 3),
        page(&[3], 2, 3),
        page(&[4, 5], 3, 3),
    ]));
    let aggregator = Aggregator::new(api.clone());

    let records = aggregator.fetch_all().await.unwrap();

    assert_eq!(ids(&records), vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
    assert_eq!(api.calls(), 3);
}

#[tokio::test]
async fn test_fetch_all_skips_empty_pages_and_null_entries() {
    let mut middle = page(&[], 2, 3);
    middle.contacts = vec![None];
    let api = Arc::new(ScriptedApi::new(vec![
        page(&[1], 1, 3),
        middle,
        page(&[3], 3, 3),
    ]));

    let records = Aggregator::new(api).fetch_all().await.unwrap();
    assert_eq!(ids(&records), vec![Some(1), Some(3)]);
}

#[tokio::test]
async fn test_fetch_all_missing_cursor_truncates() {
    let api = Arc::new(ScriptedApi::new(vec![
        AggregatedPage::new(vec![contact(1)], None),
        page(&[2], 2, 2),
    ]));

    let records = Aggregator::new(api.clone()).fetch_all().await.unwrap();

    assert_eq!(ids(&records), vec![Some(1)]);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_fetch_all_missing_cursor_fails_when_required() {
    let api = Arc::new(ScriptedApi::new(vec![AggregatedPage::new(vec![contact(1)], None)]));
    let aggregator = Aggregator::new(api).with_options(AggregationOptions {
        require_cursor: true,
        ..Default::default()
    });

    let err = aggregator.fetch_all().await.unwrap_err();
    assert!(matches!(err, Error::MalformedCursor { page: 1 }));
}

#[tokio::test]
async fn test_fetch_all_unknown_total_stops() {
    let cursor = PageCursor {
        current_page: Some(1),
        next_url: Some("/api/v1/contacts?page=2".to_string()),
        ..Default::default()
    };
    let api = Arc::new(ScriptedApi::new(vec![
        AggregatedPage::new(vec![contact(1)], Some(cursor)),
        page(&[2], 2, 2),
    ]));

    let records = Aggregator::new(api.clone()).fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_fetch_all_propagates_page_failure() {
    // Page 2 is advertised but missing, so it fails
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 2)]));

    let err = Aggregator::new(api).fetch_all().await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable { page: 2, .. }));
}

#[tokio::test]
async fn test_fetch_all_deadline() {
    let api = Arc::new(
        ScriptedApi::new(vec![page(&[1], 1, 1)]).with_delay(Duration::from_millis(200)),
    );
    let aggregator = Aggregator::new(api).with_options(AggregationOptions {
        deadline: Some(Duration::from_millis(20)),
        ..Default::default()
    });

    let err = aggregator.fetch_all().await.unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded { timeout_ms: 20 }));
}

// ============================================================================
// Cache Tests
// ============================================================================

fn cache_over(api: Arc<ScriptedApi>, config: CacheConfig) -> AggregateCache {
    AggregateCache::new(Aggregator::new(api), config)
}

#[tokio::test]
async fn test_cache_hit_does_not_refetch() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1, 2], 1, 1)]));
    let cache = cache_over(api.clone(), CacheConfig::default());

    let first = cache.get_or_compute().await.unwrap();
    let second = cache.get_or_compute().await.unwrap();
    let third = cache.get_or_compute().await.unwrap();

    assert_eq!(api.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second, &third));
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_cache_entry_is_stamped_at_computation() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 1)]));
    let cache = cache_over(api, CacheConfig::default());

    let before = chrono::Utc::now();
    let entry = cache.get_or_compute().await.unwrap();
    let after = chrono::Utc::now();

    assert!(entry.created_at() >= before);
    assert!(entry.created_at() <= after);
    assert_eq!(cache.peek().await.unwrap().created_at(), entry.created_at());
}

#[tokio::test]
async fn test_cache_evict_forces_recompute() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 1)]));
    let cache = cache_over(api.clone(), CacheConfig::default());

    let first = cache.get_or_compute().await.unwrap();
    cache.evict().await;
    assert_eq!(api.calls(), 1);
    assert!(cache.peek().await.is_none());

    let second = cache.get_or_compute().await.unwrap();
    assert_eq!(api.calls(), 2);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_cache_failure_is_not_stored() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 1)]));
    let cache = cache_over(api.clone(), CacheConfig::default());

    api.set_failing(true);
    let err = cache.get_or_compute().await.unwrap_err();
    assert!(err.is_upstream());
    assert!(cache.peek().await.is_none());

    api.set_failing(false);
    let entry = cache.get_or_compute().await.unwrap();
    assert_eq!(entry.len(), 1);
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn test_cache_failure_leaves_previous_entry() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 1)]));
    let cache = cache_over(api.clone(), CacheConfig::default());

    let first = cache.get_or_compute().await.unwrap();
    api.set_failing(true);

    let again = cache.get_or_compute().await.unwrap();
    assert!(Arc::ptr_eq(&first, &again));
}

#[tokio::test]
async fn test_cache_entry_expires_after_ttl() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 1)]));
    let cache = cache_over(
        api.clone(),
        CacheConfig {
            ttl: Duration::from_millis(50),
            ..Default::default()
        },
    );

    cache.get_or_compute().await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    cache.get_or_compute().await.unwrap();

    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn test_cache_disabled_always_recomputes() {
    let api = Arc::new(ScriptedApi::new(vec![page(&[1], 1, 1)]));
    let cache = cache_over(
        api.clone(),
        CacheConfig {
            enabled: false,
            ..Default::default()
        },
    );

    cache.get_or_compute().await.unwrap();
    cache.get_or_compute().await.unwrap();

    assert_eq!(api.calls(), 2);
    assert!(cache.peek().await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_coalesce() {
    let api = Arc::new(
        ScriptedApi::new(vec![page(&[1, 2], 1, 2), page(&[3], 2, 2)])
            .with_delay(Duration::from_millis(50)),
    );
    let cache = Arc::new(cache_over(api.clone(), CacheConfig::default()));

    let readers = (0..16).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get_or_compute().await })
    });
    let entries: Vec<_> = futures::future::join_all(readers)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    // One fetch_all sequence is two page calls
    assert_eq!(api.calls(), 2);
    assert!(entries.iter().all(|e| Arc::ptr_eq(e, &entries[0])));
    assert_eq!(entries[0].len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_share_failure() {
    let api = Arc::new(
        ScriptedApi::new(vec![page(&[1], 1, 1)]).with_delay(Duration::from_millis(50)),
    );
    api.set_failing(true);
    let cache = Arc::new(cache_over(api.clone(), CacheConfig::default()));

    let readers = (0..8).map(|_| {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move { cache.get_or_compute().await })
    });
    let results = futures::future::join_all(readers).await;

    assert_eq!(api.calls(), 1);
    for joined in results {
        let err = joined.unwrap().unwrap_err();
        assert!(err.is_upstream());
    }
}
