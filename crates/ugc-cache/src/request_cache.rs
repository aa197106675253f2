//! Keyed TTL cache with in-flight request coalescing
//!
//! Every key moves through `ABSENT -> PENDING -> FRESH -> (ttl) -> STALE ->
//! PENDING -> ...`, and from `PENDING` back to `ABSENT` when the fetch fails.
//! The pending registry and the fresh-entry check are consulted under one
//! lock, so at most one fetch per key is ever in flight. A forced refetch
//! supersedes the fetch in flight; the older one still answers its own
//! callers but never overwrites what a newer fetch stored.

use crate::error::CacheError;
use crate::key::CacheKey;
use crate::metrics::{CacheMetrics, CacheStats};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use moka::sync::Cache;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use ugc_common::{FetchError, Fetcher, Payload, RawResponse, RequestOptions};

/// Configuration for a [`RequestCache`]
#[derive(Debug, Clone)]
pub struct RequestCacheConfig {
    /// How long a successful response stays fresh; `None` keeps it until invalidated
    pub ttl: Option<Duration>,
    /// Maximum number of stored responses
    pub max_capacity: u64,
}

impl Default for RequestCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            max_capacity: 1000,
        }
    }
}

impl RequestCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Entries never expire on their own
    pub fn without_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    pub fn with_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Payload,
    stored_at: DateTime<Utc>,
    /// Id of the fetch that produced this entry
    generation: u64,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Payload, FetchError>>>;

struct PendingRequest {
    /// Distinguishes this fetch from a later one for the same key
    id: u64,
    future: SharedFetch,
}

enum Lookup {
    Fresh(Payload),
    InFlight(SharedFetch),
}

struct CacheInner {
    fetcher: Arc<dyn Fetcher>,
    entries: Cache<CacheKey, CacheEntry>,
    pending: Mutex<HashMap<CacheKey, PendingRequest>>,
    errors: Mutex<HashMap<CacheKey, FetchError>>,
    metrics: CacheMetrics,
    next_id: AtomicU64,
    config: RequestCacheConfig,
}

impl CacheInner {
    /// Record the outcome of fetch `id` for `key`
    fn settle(&self, key: &CacheKey, id: u64, outcome: &Result<Payload, FetchError>) {
        // Store before releasing the pending slot so a caller that finds no
        // pending request is guaranteed to see the entry
        let mut pending = self.pending.lock();
        let superseded = pending.get(key).is_some_and(|p| p.id > id)
            || self.entries.get(key).is_some_and(|e| e.generation > id);

        match outcome {
            Ok(payload) => {
                if superseded {
                    debug!("Discarding superseded response: {}", key);
                } else {
                    self.entries.insert(
                        key.clone(),
                        CacheEntry {
                            payload: Arc::clone(payload),
                            stored_at: Utc::now(),
                            generation: id,
                        },
                    );
                    self.errors.lock().remove(key);
                }
                info!("API success: {}", key.resource_id());
            }
            Err(e) => {
                self.metrics.record_failure();
                if !superseded {
                    self.errors.lock().insert(key.clone(), e.clone());
                }
                error!("API error {}: {}", key.resource_id(), e);
            }
        }

        if pending.get(key).is_some_and(|p| p.id == id) {
            pending.remove(key);
        }
    }

    fn release(&self, key: &CacheKey, id: u64) {
        let mut pending = self.pending.lock();
        if pending.get(key).is_some_and(|p| p.id == id) {
            pending.remove(key);
        }
    }
}

/// Deduplicating, TTL-based cache in front of a [`Fetcher`]
///
/// Cheap to clone; clones share the same entries and in-flight requests.
#[derive(Clone)]
pub struct RequestCache {
    inner: Arc<CacheInner>,
}

impl fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestCache")
            .field("config", &self.inner.config)
            .field("pending", &self.inner.pending.lock().len())
            .finish_non_exhaustive()
    }
}

impl RequestCache {
    /// Create a new cache in front of `fetcher`
    pub fn new(fetcher: Arc<dyn Fetcher>, config: RequestCacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            inner: Arc::new(CacheInner {
                fetcher,
                entries: builder.build(),
                pending: Mutex::new(HashMap::new()),
                errors: Mutex::new(HashMap::new()),
                metrics: CacheMetrics::default(),
                next_id: AtomicU64::new(0),
                config,
            }),
        }
    }

    pub fn config(&self) -> &RequestCacheConfig {
        &self.inner.config
    }

    /// Fetch `resource_id`, serving fresh entries from memory and joining any
    /// request for the same key that is already in flight.
    ///
    /// The fetch itself runs on its own task: it completes and updates the
    /// cache even if every caller stops waiting.
    #[instrument(skip(self, options), fields(resource = %resource_id))]
    pub async fn request(
        &self,
        resource_id: &str,
        options: &RequestOptions,
    ) -> Result<Payload, CacheError> {
        let key = CacheKey::new(resource_id, options);
        let future = match self.lookup_or_start(key, options) {
            Lookup::Fresh(payload) => return Ok(payload),
            Lookup::InFlight(future) => future,
        };

        Self::finish(resource_id, future).await
    }

    /// Fetch `resource_id` again, ignoring the fresh entry and any request
    /// for the same key that is already in flight.
    ///
    /// The stored entry is dropped up front. An older request still running
    /// answers its own callers, but its result is not stored over this one.
    #[instrument(skip(self, options), fields(resource = %resource_id))]
    pub async fn refetch(
        &self,
        resource_id: &str,
        options: &RequestOptions,
    ) -> Result<Payload, CacheError> {
        let key = CacheKey::new(resource_id, options);
        let future = {
            let mut pending = self.inner.pending.lock();
            if self.inner.entries.remove(&key).is_some() {
                self.inner.metrics.record_invalidations(1);
            }
            if pending.contains_key(&key) {
                debug!("Superseding request in progress: {}", key);
            }
            self.start(&mut pending, key, options)
        };

        Self::finish(resource_id, future).await
    }

    async fn finish(resource_id: &str, future: SharedFetch) -> Result<Payload, CacheError> {
        future.await.map_err(|source| CacheError::Fetch {
            resource: resource_id.to_string(),
            source,
        })
    }

    /// Like [`request`](Self::request), deserializing the payload into `T`
    pub async fn request_as<T>(
        &self,
        resource_id: &str,
        options: &RequestOptions,
    ) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        let payload = self.request(resource_id, options).await?;
        T::deserialize(&*payload).map_err(|source| CacheError::Decode {
            resource: resource_id.to_string(),
            source,
        })
    }

    /// Fresh entry for a request, without any I/O
    pub fn peek(&self, resource_id: &str, options: &RequestOptions) -> Option<Payload> {
        self.inner
            .entries
            .get(&CacheKey::new(resource_id, options))
            .map(|entry| entry.payload)
    }

    /// When the fresh entry for a request was stored
    pub fn stored_at(&self, resource_id: &str, options: &RequestOptions) -> Option<DateTime<Utc>> {
        self.inner
            .entries
            .get(&CacheKey::new(resource_id, options))
            .map(|entry| entry.stored_at)
    }

    fn lookup_or_start(&self, key: CacheKey, options: &RequestOptions) -> Lookup {
        let mut pending = self.inner.pending.lock();

        if let Some(entry) = self.inner.entries.get(&key) {
            debug!("Cache hit: {}", key);
            self.inner.metrics.record_hit();
            return Lookup::Fresh(entry.payload);
        }

        if let Some(in_flight) = pending.get(&key) {
            debug!("Request in progress: {}", key);
            self.inner.metrics.record_coalesced();
            return Lookup::InFlight(in_flight.future.clone());
        }

        debug!("Cache miss: {}", key);
        self.inner.metrics.record_miss();
        Lookup::InFlight(self.start(&mut pending, key, options))
    }

    /// Spawn a fetch for `key` and make it the one new callers join
    fn start(
        &self,
        pending: &mut HashMap<CacheKey, PendingRequest>,
        key: CacheKey,
        options: &RequestOptions,
    ) -> SharedFetch {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let future = self.spawn_fetch(key.clone(), id, options.clone());
        pending.insert(
            key,
            PendingRequest {
                id,
                future: future.clone(),
            },
        );
        future
    }

    fn spawn_fetch(&self, key: CacheKey, id: u64, options: RequestOptions) -> SharedFetch {
        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            inner.metrics.record_fetch();
            let outcome = inner
                .fetcher
                .fetch(task_key.resource_id(), &options)
                .await
                .and_then(RawResponse::into_payload)
                .map(Arc::new);
            inner.settle(&task_key, id, &outcome);
            outcome
        });

        let inner = Arc::clone(&self.inner);
        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    // The task died before settling; free the key for a retry
                    inner.release(&key, id);
                    Err(FetchError::Aborted(join_error.to_string()))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drop every fresh entry whose resource id starts with `prefix`.
    ///
    /// In-flight requests are left alone and store their result when they
    /// finish. Returns the number of entries removed.
    #[instrument(skip(self))]
    pub fn invalidate(&self, prefix: &str) -> u64 {
        let keys: Vec<CacheKey> = self
            .inner
            .entries
            .iter()
            .filter(|(key, _)| key.matches_prefix(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();

        let mut removed = 0;
        for key in keys {
            if self.inner.entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        self.inner.metrics.record_invalidations(removed);
        info!("Cache cleared for pattern '{}': {} entries", prefix, removed);
        removed
    }

    /// Drop the fresh entry for one exact request
    pub fn invalidate_key(&self, resource_id: &str, options: &RequestOptions) -> bool {
        let removed = self
            .inner
            .entries
            .remove(&CacheKey::new(resource_id, options))
            .is_some();
        if removed {
            self.inner.metrics.record_invalidations(1);
            debug!("Invalidated cache entry for {}", resource_id);
        }
        removed
    }

    /// Empty the cache, the pending registry and the error registry.
    ///
    /// Fetches already running are not cancelled; callers awaiting them still
    /// get their result, which is then stored in the emptied cache.
    pub fn clear_all(&self) {
        let entries = self.entry_count();
        self.inner.entries.invalidate_all();
        self.inner.pending.lock().clear();
        self.inner.errors.lock().clear();
        self.inner.metrics.record_invalidations(entries);
        info!("All cache cleared ({} entries)", entries);
    }

    /// Most recent failure of one exact request, cleared by its next success
    pub fn last_error(&self, resource_id: &str, options: &RequestOptions) -> Option<FetchError> {
        self.inner
            .errors
            .lock()
            .get(&CacheKey::new(resource_id, options))
            .cloned()
    }

    /// Counts of stored entries, in-flight requests and failing requests
    pub fn stats(&self) -> CacheStats {
        let pending = self.inner.pending.lock().len();
        let errors = self.inner.errors.lock().len();
        CacheStats::from_metrics(&self.inner.metrics, self.entry_count(), pending, errors)
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.inner.metrics
    }

    fn entry_count(&self) -> u64 {
        // iter() skips expired and invalidated entries, entry_count() may lag
        self.inner.entries.iter().count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ugc_common::test_utils::MockFetcher;

    fn cache_with(fetcher: Arc<MockFetcher>) -> RequestCache {
        RequestCache::new(fetcher, RequestCacheConfig::default())
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_memory() {
        let fetcher = Arc::new(MockFetcher::new().with_response("/services/", json!([1, 2, 3])));
        let cache = cache_with(Arc::clone(&fetcher));

        let first = cache.request("/services/", &RequestOptions::new()).await.unwrap();
        let second = cache.request("/services/", &RequestOptions::new()).await.unwrap();

        assert_eq!(*first, json!([1, 2, 3]));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.call_count("/services/"), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.pending, 0);
    }

    #[tokio::test]
    async fn test_different_options_are_different_entries() {
        let fetcher = Arc::new(MockFetcher::new().with_response("/projects/", json!([])));
        let cache = cache_with(Arc::clone(&fetcher));

        let page1 = RequestOptions::new().with_query("page", 1);
        let page2 = RequestOptions::new().with_query("page", 2);
        cache.request("/projects/", &page1).await.unwrap();
        cache.request("/projects/", &page2).await.unwrap();
        cache.request("/projects/", &page1).await.unwrap();

        assert_eq!(fetcher.call_count("/projects/"), 2);
        assert_eq!(fetcher.last_options("/projects/"), Some(page2));
    }

    #[tokio::test]
    async fn test_release_ignores_superseded_fetch() {
        let fetcher = Arc::new(MockFetcher::new());
        let cache = cache_with(fetcher);
        let key = CacheKey::for_resource("/jobs/");

        let placeholder = futures::future::ready(Err(FetchError::Aborted("test".into())))
            .boxed()
            .shared();
        cache.inner.pending.lock().insert(
            key.clone(),
            PendingRequest {
                id: 7,
                future: placeholder,
            },
        );

        cache.inner.release(&key, 3);
        assert_eq!(cache.stats().pending, 1);
        cache.inner.release(&key, 7);
        assert_eq!(cache.stats().pending, 0);
    }

    #[test]
    fn test_older_fetch_does_not_overwrite_newer_entry() {
        let cache = cache_with(Arc::new(MockFetcher::new()));
        let key = CacheKey::for_resource("/services/");

        cache.inner.settle(&key, 5, &Ok(Arc::new(json!(["new"]))));
        cache.inner.settle(&key, 2, &Ok(Arc::new(json!(["old"]))));
        cache
            .inner
            .settle(&key, 3, &Err(FetchError::Network("reset".into())));

        let stored = cache.peek("/services/", &RequestOptions::new()).unwrap();
        assert_eq!(*stored, json!(["new"]));
        assert!(cache.last_error("/services/", &RequestOptions::new()).is_none());
    }

    #[tokio::test]
    async fn test_request_as_decodes_payload() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Stats {
            experience: String,
            projects: String,
        }

        let fetcher = Arc::new(MockFetcher::new().with_response(
            "/homepage/stats/",
            json!({"success": true, "data": {"experience": "5+", "projects": "100+"}}),
        ));
        let cache = cache_with(fetcher);

        let stats: Stats = cache
            .request_as("/homepage/stats/", &RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(stats.experience, "5+");

        let err = cache
            .request_as::<Vec<u32>>("/homepage/stats/", &RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Decode { .. }));
    }
}
