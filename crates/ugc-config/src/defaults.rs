//! Default values.

use crate::schema::*;
use ugc_common::LogFormat;

/// Default content API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default freshness window of cached responses (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
/// Default capacity of the request cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
/// Default interface language.
pub const DEFAULT_LANGUAGE: &str = "uk";
/// Default dictionary resource template.
pub const DEFAULT_TRANSLATION_RESOURCE: &str = "/translations/{lang}/all/";
/// Default key of the persisted language.
pub const DEFAULT_LANGUAGE_KEY: &str = "ugc.language";

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            cache: CacheSettings::default(),
            translations: TranslationSettings::default(),
            persistence: PersistenceSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_idle_per_host: 10,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            resource_template: DEFAULT_TRANSLATION_RESOURCE.to_string(),
            ttl_secs: None,
        }
    }
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            file: None,
            language_key: DEFAULT_LANGUAGE_KEY.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
            include_spans: false,
        }
    }
}
