//! Test utilities shared across the workspace.
//!
//! Enabled for other crates through the `testing` feature.

use crate::error::{FetchError, Result, UgcError};
use crate::fetcher::{Fetcher, RawResponse, RequestOptions};
use crate::persistence::Persistence;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Scripted [`Fetcher`] that records every call.
///
/// Replies are looked up by resource id at call time; unknown resources answer
/// `HTTP 404`. An optional delay keeps requests in flight long enough to
/// observe coalescing.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, std::result::Result<Value, FetchError>>>,
    requests: Mutex<Vec<(String, RequestOptions)>>,
    delay: Mutex<Option<Duration>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `resource_id` with `body` (any envelope shape)
    pub fn with_response(self, resource_id: impl Into<String>, body: Value) -> Self {
        self.set_response(resource_id, body);
        self
    }

    /// Fail every call for `resource_id`
    pub fn with_failure(self, resource_id: impl Into<String>, error: FetchError) -> Self {
        self.set_failure(resource_id, error);
        self
    }

    /// Sleep this long before answering
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    pub fn set_response(&self, resource_id: impl Into<String>, body: Value) {
        self.routes.lock().insert(resource_id.into(), Ok(body));
    }

    pub fn set_failure(&self, resource_id: impl Into<String>, error: FetchError) {
        self.routes.lock().insert(resource_id.into(), Err(error));
    }

    /// Number of calls made for `resource_id`
    pub fn call_count(&self, resource_id: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|(resource, _)| resource == resource_id)
            .count()
    }

    /// Number of calls made for any resource
    pub fn total_calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Options passed with the most recent call for `resource_id`
    pub fn last_options(&self, resource_id: &str) -> Option<RequestOptions> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|(resource, _)| resource == resource_id)
            .map(|(_, options)| options.clone())
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(
        &self,
        resource_id: &str,
        options: &RequestOptions,
    ) -> std::result::Result<RawResponse, FetchError> {
        self.requests
            .lock()
            .push((resource_id.to_string(), options.clone()));
        let reply = self.routes.lock().get(resource_id).cloned();
        let delay = *self.delay.lock();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Ok(body)) => Ok(RawResponse::from_value(body)),
            Some(Err(error)) => Err(error),
            None => Err(FetchError::status(404, "Not Found")),
        }
    }
}

/// Store whose writes always fail and which never holds anything
#[derive(Debug, Default)]
pub struct FailingStorage;

impl Persistence for FailingStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<()> {
        Err(UgcError::persistence(format!("storage disabled, cannot write '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_fetcher_records_calls() {
        let fetcher = MockFetcher::new().with_response("/services/", json!([1, 2]));

        let raw = fetcher
            .fetch("/services/", &RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(raw.into_payload().unwrap(), json!([1, 2]));

        let missing = fetcher.fetch("/jobs/", &RequestOptions::new()).await;
        assert_eq!(missing.unwrap_err().status_code(), Some(404));

        assert_eq!(fetcher.call_count("/services/"), 1);
        assert_eq!(fetcher.total_calls(), 2);
    }

    #[test]
    fn test_failing_storage() {
        let storage = FailingStorage;
        assert!(storage.set_item("ugc.language", "en").is_err());
        assert!(storage.get_item("ugc.language").is_none());
    }
}
