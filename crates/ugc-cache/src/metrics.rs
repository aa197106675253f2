//! Cache counters and the stats snapshot exposed to operators

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for a [`RequestCache`](crate::RequestCache)
#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub coalesced: AtomicU64,
    pub fetches: AtomicU64,
    pub failures: AtomicU64,
    pub invalidations: AtomicU64,
}

impl CacheMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidations(&self, count: u64) {
        self.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Point-in-time view of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Fresh entries currently stored
    pub entries: u64,
    /// Requests currently in flight
    pub pending: usize,
    /// Requests (resource id plus options) whose most recent attempt failed
    pub errors: usize,
    pub hits: u64,
    pub misses: u64,
    /// Callers that joined an in-flight request instead of starting one
    pub coalesced: u64,
    /// Calls made through the fetcher
    pub fetches: u64,
    pub failures: u64,
    pub invalidations: u64,
}

impl CacheStats {
    pub(crate) fn from_metrics(metrics: &CacheMetrics, entries: u64, pending: usize, errors: usize) -> Self {
        Self {
            entries,
            pending,
            errors,
            hits: metrics.hits.load(Ordering::Relaxed),
            misses: metrics.misses.load(Ordering::Relaxed),
            coalesced: metrics.coalesced.load(Ordering::Relaxed),
            fetches: metrics.fetches.load(Ordering::Relaxed),
            failures: metrics.failures.load(Ordering::Relaxed),
            invalidations: metrics.invalidations.load(Ordering::Relaxed),
        }
    }
}
