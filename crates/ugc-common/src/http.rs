//! HTTP fetcher for the content API
//!
//! Thin `reqwest` adapter implementing [`Fetcher`]. It owns transport
//! concerns only (base URL, timeout, connection pooling, status mapping);
//! caching and coalescing live in the layers above it.

use crate::error::{FetchError, Result, UgcError};
use crate::fetcher::{Fetcher, RawResponse, RequestOptions};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Base URL of the content API (e.g. "http://127.0.0.1:8000/api/v1")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/v1".to_string(),
            timeout_secs: 30,
            max_idle_per_host: 10,
        }
    }
}

impl HttpFetcherConfig {
    /// Create a configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// `reqwest`-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration
    pub fn new(config: HttpFetcherConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            UgcError::config_with_source(format!("Invalid API base URL '{}'", config.base_url), e)
        })?;
        if config.timeout_secs == 0 {
            return Err(UgcError::config("Request timeout must be greater than 0"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| UgcError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Join the base URL and a resource id
    pub fn build_url(&self, resource_id: &str) -> String {
        if resource_id.starts_with('/') {
            format!("{}{}", self.base_url, resource_id)
        } else {
            format!("{}/{}", self.base_url, resource_id)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self, options), fields(method = %options.method()))]
    async fn fetch(
        &self,
        resource_id: &str,
        options: &RequestOptions,
    ) -> std::result::Result<RawResponse, FetchError> {
        let url = self.build_url(resource_id);
        let method = Method::from_bytes(options.method().as_bytes())
            .map_err(|_| FetchError::Network(format!("invalid method '{}'", options.method())))?;
        debug!("Sending {} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");
        let query = options.query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = options.body() {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Request to {} timed out", url);
                FetchError::Network(format!("request to {url} timed out"))
            } else {
                warn!("Request to {} failed: {}", url, e);
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        let raw = RawResponse::from_value(body);
        debug!("Received {} response from {}", raw.kind(), url);
        Ok(raw)
    }
}
