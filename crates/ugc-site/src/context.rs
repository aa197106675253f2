//! Application-level provider shared by every page.

use crate::error::SiteResult;
use crate::preload::{preload_critical_data, PreloadReport};
use crate::resources::Resource;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use ugc_cache::{CacheStats, RequestCache, RequestCacheConfig};
use ugc_common::{FileStorage, Fetcher, HttpFetcher, Payload, Persistence, RequestOptions};
use ugc_config::Config;
use ugc_i18n::{Language, TranslationResolver, TranslationStats};

/// Statistics of both caches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    /// Translation resolver state.
    pub translations: TranslationStats,
    /// Content request cache.
    pub requests: CacheStats,
}

/// Holds the translation resolver and the content request cache.
///
/// Built once per session and passed to whatever renders pages.
#[derive(Debug, Clone)]
pub struct SiteContext {
    config: Arc<Config>,
    translations: Arc<TranslationResolver>,
    requests: RequestCache,
}

impl SiteContext {
    /// Creates a context from injected capabilities.
    pub fn new(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        persistence: Option<Arc<dyn Persistence>>,
        locale_hint: Option<&str>,
    ) -> SiteResult<Self> {
        let default_language: Language = config.translations.default_language.parse()?;

        let mut builder = TranslationResolver::builder(Arc::clone(&fetcher))
            .default_language(default_language)
            .resource_template(config.translations.resource_template.clone())
            .ttl(config.translations.ttl())
            .storage_key(config.persistence.language_key.clone());
        if let Some(persistence) = persistence {
            builder = builder.persistence(persistence);
        }
        if let Some(hint) = locale_hint {
            builder = builder.locale_hint(hint);
        }

        let requests = RequestCache::new(
            fetcher,
            RequestCacheConfig::default()
                .with_ttl(config.cache.ttl())
                .with_capacity(config.cache.max_capacity),
        );

        Ok(Self {
            config: Arc::new(config),
            translations: builder.build(),
            requests,
        })
    }

    /// Creates a context talking HTTP to the configured API, with file
    /// persistence when configured and the OS locale as language hint.
    pub fn from_config(config: Config) -> SiteResult<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.api.fetcher_config())?);
        let persistence = config
            .persistence
            .file
            .as_ref()
            .map(|path| Arc::new(FileStorage::new(path)) as Arc<dyn Persistence>);
        let locale = sys_locale::get_locale();

        Self::new(config, fetcher, persistence, locale.as_deref())
    }

    /// Loads the initial dictionary; failure leaves built-in translations in use.
    pub async fn initialize(&self) {
        if let Err(e) = self.translations.initialize().await {
            warn!("Starting with built-in translations: {}", e);
        }
        info!(
            "Site context ready (language {})",
            self.translations.current_language()
        );
    }

    /// Configuration the context was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translation resolver.
    pub fn translations(&self) -> &Arc<TranslationResolver> {
        &self.translations
    }

    /// Content request cache.
    pub fn requests(&self) -> &RequestCache {
        &self.requests
    }

    /// Fetches a catalogued resource through the request cache.
    pub async fn fetch(&self, resource: Resource, options: &RequestOptions) -> SiteResult<Payload> {
        Ok(self.requests.request(&resource.path(), options).await?)
    }

    /// Warms the request cache and the default-language dictionary.
    pub async fn preload_critical_data(&self) -> PreloadReport {
        preload_critical_data(&self.requests, &self.translations).await
    }

    /// Statistics of both caches.
    pub fn stats(&self) -> SiteStats {
        SiteStats {
            translations: self.translations.stats(),
            requests: self.requests.stats(),
        }
    }
}
