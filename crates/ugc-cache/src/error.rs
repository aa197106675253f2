//! Error types for cached requests

use thiserror::Error;
use ugc_common::FetchError;

/// Errors returned by [`RequestCache`](crate::RequestCache)
#[derive(Error, Debug)]
pub enum CacheError {
    /// The underlying fetch failed; every caller waiting on it sees this
    #[error("Request for '{resource}' failed: {source}")]
    Fetch {
        resource: String,
        #[source]
        source: FetchError,
    },

    /// The payload did not match the requested type
    #[error("Unexpected payload for '{resource}': {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// The fetch failure behind this error, if any
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            Self::Decode { .. } => None,
        }
    }

    /// Resource id the failed request was for
    pub fn resource(&self) -> &str {
        match self {
            Self::Fetch { resource, .. } | Self::Decode { resource, .. } => resource,
        }
    }
}
