//! Request cache for the UGC content API
//!
//! [`RequestCache`] sits in front of a [`Fetcher`](ugc_common::Fetcher) and
//! guarantees that:
//!
//! - a successful response is served from memory until its TTL runs out
//! - concurrent requests for the same resource and options share one call
//! - failures reach every waiting caller but are never cached
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ugc_cache::{RequestCache, RequestCacheConfig};
//! use ugc_common::{HttpFetcher, HttpFetcherConfig, RequestOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Arc::new(HttpFetcher::new(HttpFetcherConfig::default())?);
//! let cache = RequestCache::new(fetcher, RequestCacheConfig::default());
//!
//! let services = cache.request("/services/", &RequestOptions::new()).await?;
//! println!("{services}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod key;
pub mod metrics;
pub mod request_cache;

pub use error::CacheError;
pub use key::CacheKey;
pub use metrics::{CacheMetrics, CacheStats};
pub use request_cache::{RequestCache, RequestCacheConfig};
