//! Common building blocks for the UGC site core
//!
//! This crate holds the pieces every other crate in the workspace leans on:
//!
//! - [`UgcError`] and the crate-wide [`Result`] alias
//! - the [`Fetcher`] capability and the [`RawResponse`] envelope it returns
//! - [`HttpFetcher`], the `reqwest`-backed fetcher used in production
//! - the [`Persistence`] capability with memory and file backed stores
//! - tracing bootstrap in [`logging`]

pub mod error;
pub mod fetcher;
pub mod http;
pub mod logging;
pub mod persistence;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{FetchError, Result, UgcError};
pub use fetcher::{Fetcher, Payload, RawResponse, RequestOptions};
pub use http::{HttpFetcher, HttpFetcherConfig};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use persistence::{FileStorage, MemoryStorage, Persistence};
