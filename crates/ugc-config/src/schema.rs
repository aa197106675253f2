//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use ugc_common::{HttpFetcherConfig, LogFormat, LoggingConfig};

/// Main configuration structure for the UGC site core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content API connection settings.
    pub api: ApiSettings,
    /// Request cache settings.
    pub cache: CacheSettings,
    /// Translation resolver settings.
    pub translations: TranslationSettings,
    /// Preference persistence settings.
    pub persistence: PersistenceSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Content API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every resource id is appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Idle connections kept per host.
    pub max_idle_per_host: usize,
}

/// Request cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a successful response stays fresh.
    pub ttl_secs: u64,
    /// Maximum number of cached responses.
    pub max_capacity: u64,
}

/// Translation resolver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Language used when nothing else is known, and as cross-language fallback.
    pub default_language: String,
    /// Resource id of a language dictionary; `{lang}` is replaced by the code.
    pub resource_template: String,
    /// Seconds a downloaded dictionary stays fresh; unset keeps it for the session.
    pub ttl_secs: Option<u64>,
}

/// Preference persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// JSON file holding persisted preferences; unset disables persistence.
    pub file: Option<PathBuf>,
    /// Key the chosen language is stored under.
    pub language_key: String,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `ugc_cache=debug,info`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Directory for rolling log files; stdout when unset.
    pub directory: Option<PathBuf>,
    /// Whether span open/close events are logged.
    pub include_spans: bool,
}

impl ApiSettings {
    /// Settings for the HTTP fetcher.
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            max_idle_per_host: self.max_idle_per_host,
        }
    }
}

impl CacheSettings {
    /// Freshness window of cached responses.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl TranslationSettings {
    /// Freshness window of downloaded dictionaries.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl LoggingSettings {
    /// Settings for the tracing bootstrap.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            directory: self.directory.clone(),
            include_spans: self.include_spans,
            ..LoggingConfig::default()
        }
    }
}
