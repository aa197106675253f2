//! Translation resolver

use crate::dictionary::{interpolate, Dictionary, Params};
use crate::error::{TranslationError, TranslationResult};
use crate::fallback;
use crate::language::Language;
use crate::listeners::{LanguageListener, ListenerSet};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use ugc_cache::{CacheStats, RequestCache, RequestCacheConfig};
use ugc_common::{Fetcher, Persistence, RequestOptions};

/// Resource id of a language dictionary; `{lang}` is replaced by the code
pub const DEFAULT_RESOURCE_TEMPLATE: &str = "/translations/{lang}/all/";
/// Persistence key of the chosen language
pub const DEFAULT_STORAGE_KEY: &str = "ugc.language";

/// Builder for [`TranslationResolver`]
pub struct TranslationResolverBuilder {
    fetcher: Arc<dyn Fetcher>,
    persistence: Option<Arc<dyn Persistence>>,
    locale_hint: Option<String>,
    default_language: Language,
    resource_template: String,
    ttl: Option<Duration>,
    storage_key: String,
}

impl TranslationResolverBuilder {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            persistence: None,
            locale_hint: None,
            default_language: Language::default(),
            resource_template: DEFAULT_RESOURCE_TEMPLATE.to_string(),
            ttl: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Remember the chosen language in `persistence`
    pub fn persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Host locale such as `en-US`, consulted when nothing was persisted
    pub fn locale_hint(mut self, hint: impl Into<String>) -> Self {
        self.locale_hint = Some(hint.into());
        self
    }

    pub fn default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn resource_template(mut self, template: impl Into<String>) -> Self {
        self.resource_template = template.into();
        self
    }

    /// How long a downloaded dictionary is reused; `None` keeps it until refreshed
    pub fn ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Build the resolver with built-in dictionaries for every language.
    ///
    /// No network call is made; call [`TranslationResolver::initialize`] to
    /// download the dictionary of the initial language.
    pub fn build(self) -> Arc<TranslationResolver> {
        let initial = self.initial_language();

        let config = RequestCacheConfig {
            ttl: self.ttl,
            max_capacity: 16,
        };

        let dictionaries = Language::all()
            .into_iter()
            .map(|language| (language, fallback::dictionary(language)))
            .collect();

        info!("Translation resolver created with language {}", initial);

        Arc::new(TranslationResolver {
            state: RwLock::new(ResolverState {
                current: initial,
                dictionaries,
            }),
            listeners: ListenerSet::new(),
            switch: Mutex::new(()),
            cache: RequestCache::new(self.fetcher, config),
            persistence: self.persistence,
            default_language: self.default_language,
            resource_template: self.resource_template,
            storage_key: self.storage_key,
            ready: AtomicBool::new(false),
        })
    }

    /// Persisted choice, then host locale, then the default language
    fn initial_language(&self) -> Language {
        if let Some(stored) = self
            .persistence
            .as_ref()
            .and_then(|p| p.get_item(&self.storage_key))
        {
            match Language::from_code(&stored) {
                Some(language) => {
                    debug!("Using persisted language {}", language);
                    return language;
                }
                None => debug!("Ignoring persisted language '{}'", stored),
            }
        }

        if let Some(language) = self
            .locale_hint
            .as_deref()
            .and_then(Language::from_locale_hint)
        {
            debug!("Using host locale language {}", language);
            return language;
        }

        self.default_language
    }
}

struct ResolverState {
    current: Language,
    dictionaries: HashMap<Language, Dictionary>,
}

/// Snapshot of the resolver state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationStats {
    pub current_language: Language,
    pub default_language: Language,
    pub ready: bool,
    /// Number of keys known per language
    pub entries: BTreeMap<Language, usize>,
    pub listeners: usize,
    /// Dictionary downloads
    pub cache: CacheStats,
}

/// Resolves translation keys in the current language.
///
/// Lookups never wait on the network: until a dictionary has been downloaded
/// the built-in one answers, and a key missing everywhere resolves to itself.
pub struct TranslationResolver {
    state: RwLock<ResolverState>,
    listeners: ListenerSet,
    /// Held from committing a language until its listeners have been told
    switch: Mutex<()>,
    cache: RequestCache,
    persistence: Option<Arc<dyn Persistence>>,
    default_language: Language,
    resource_template: String,
    storage_key: String,
    ready: AtomicBool,
}

impl fmt::Debug for TranslationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationResolver")
            .field("current", &self.current_language())
            .field("default_language", &self.default_language)
            .field("ready", &self.is_ready())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl TranslationResolver {
    pub fn builder(fetcher: Arc<dyn Fetcher>) -> TranslationResolverBuilder {
        TranslationResolverBuilder::new(fetcher)
    }

    /// Download the dictionary of the initial language.
    ///
    /// The resolver is ready afterwards whether or not the download
    /// succeeded; on failure the built-in dictionary keeps answering.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> TranslationResult<()> {
        let language = self.current_language();
        let result = self.load(language).await;
        self.ready.store(true, Ordering::Release);

        match result {
            Ok(_) => {
                info!("Translations ready for {}", language);
                Ok(())
            }
            Err(e) => {
                warn!("Using built-in translations for {}: {}", language, e);
                Err(e)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn current_language(&self) -> Language {
        self.state.read().current
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    pub fn available_languages(&self) -> Vec<Language> {
        Language::all()
    }

    /// Text for `key` in the current language
    pub fn resolve(&self, key: &str) -> String {
        self.translate(self.current_language(), key, None)
    }

    /// Text for `key` in the current language with `{{name}}` placeholders filled
    pub fn resolve_with(&self, key: &str, params: &Params) -> String {
        self.translate(self.current_language(), key, Some(params))
    }

    /// Text for `key` in `language`, whatever the current language is
    pub fn translate_in(&self, language: Language, key: &str, params: Option<&Params>) -> String {
        self.translate(language, key, params)
    }

    fn translate(&self, language: Language, key: &str, params: Option<&Params>) -> String {
        let found = {
            let state = self.state.read();
            let lookup = |lang: Language| state.dictionaries.get(&lang).and_then(|d| d.get(key));
            lookup(language)
                .or_else(|| {
                    (language != self.default_language)
                        .then(|| lookup(self.default_language))
                        .flatten()
                })
                .map(|template| interpolate(template, params))
        };

        found.unwrap_or_else(|| {
            if self.is_ready() {
                warn!("Translation missing: {} ({})", key, language);
            }
            key.to_string()
        })
    }

    /// Whether `key` resolves to something other than itself
    pub fn has_translation(&self, key: &str) -> bool {
        let state = self.state.read();
        [state.current, self.default_language]
            .iter()
            .any(|lang| state.dictionaries.get(lang).is_some_and(|d| d.contains(key)))
    }

    /// Merge `entries` into the dictionary of `language`
    pub fn add_translations<I, K, V>(&self, language: Language, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut additions = Dictionary::new();
        for (key, template) in entries {
            additions.insert(key, template);
        }
        let count = additions.len();

        self.state
            .write()
            .dictionaries
            .entry(language)
            .or_default()
            .merge(additions);
        debug!("Added {} translations for {}", count, language);
    }

    /// Switch to `language`.
    ///
    /// The switch is committed, persisted and announced to listeners before
    /// the dictionary download starts. Overlapping switches announce in the
    /// order they commit, so the last notification always names the current
    /// language. A failed download does not undo the switch; it is reported
    /// only to this caller.
    #[instrument(skip(self))]
    pub async fn change_language(&self, language: Language) -> TranslationResult<()> {
        {
            let _switch = self.switch.lock();
            {
                let mut state = self.state.write();
                if state.current == language {
                    debug!("Language is already {}", language);
                    return Ok(());
                }
                state.current = language;
            }
            info!("Language changed to {}", language);

            self.persist(language);
            self.listeners.notify(language);
        }

        match self.load(language).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to load translations after switching to {}: {}", language, e);
                Err(TranslationError::LanguageSwitch {
                    language,
                    source: Box::new(e),
                })
            }
        }
    }

    /// Download the current language's dictionary again and re-notify listeners.
    ///
    /// Starts a new download even when one for the same dictionary is
    /// already running, so the result reflects the server at the time of
    /// the call. Listeners are skipped if the language was switched while
    /// the download ran; that switch has announced itself already.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> TranslationResult<()> {
        let language = self.current_language();
        let payload = self
            .cache
            .refetch(&self.resource_for(language), &RequestOptions::new())
            .await
            .map_err(|source| TranslationError::Fetch { language, source })?;
        self.merge_payload(language, &payload)?;
        info!("Translations refreshed for {}", language);

        let _switch = self.switch.lock();
        if self.current_language() == language {
            self.listeners.notify(language);
        } else {
            debug!("Language left {} during refresh, not notifying", language);
        }
        Ok(())
    }

    /// Download the dictionary of `language` without switching to it.
    ///
    /// Returns the number of keys received.
    pub async fn preload(&self, language: Language) -> TranslationResult<usize> {
        self.load(language).await
    }

    /// Forget every downloaded dictionary and go back to the built-in ones
    pub fn clear_cache(&self) {
        let mut state = self.state.write();
        state.dictionaries = Language::all()
            .into_iter()
            .map(|language| (language, fallback::dictionary(language)))
            .collect();
        self.cache.clear_all();
        info!("Translation cache cleared");
    }

    /// Register `listener`; returns false if it was already registered
    pub fn add_language_change_listener(&self, listener: LanguageListener) -> bool {
        self.listeners.add(listener)
    }

    /// Unregister `listener`; returns false if it was not registered
    pub fn remove_language_change_listener(&self, listener: &LanguageListener) -> bool {
        self.listeners.remove(listener)
    }

    /// Register a closure and return the handle needed to remove it
    pub fn on_language_change<F>(&self, callback: F) -> LanguageListener
    where
        F: Fn(Language) + Send + Sync + 'static,
    {
        let listener: LanguageListener = Arc::new(callback);
        self.listeners.add(Arc::clone(&listener));
        listener
    }

    pub fn stats(&self) -> TranslationStats {
        let (current_language, entries) = {
            let state = self.state.read();
            let entries = state
                .dictionaries
                .iter()
                .map(|(language, dictionary)| (*language, dictionary.len()))
                .collect();
            (state.current, entries)
        };

        TranslationStats {
            current_language,
            default_language: self.default_language,
            ready: self.is_ready(),
            entries,
            listeners: self.listeners.len(),
            cache: self.cache.stats(),
        }
    }

    /// Resource id of the dictionary for `language`
    pub fn resource_for(&self, language: Language) -> String {
        self.resource_template.replace("{lang}", language.code())
    }

    fn persist(&self, language: Language) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        if let Err(e) = persistence.set_item(&self.storage_key, language.code()) {
            warn!("Could not persist language {}: {}", language, e);
        }
    }

    /// Fetch (or reuse) the dictionary of `language` and merge it in
    async fn load(&self, language: Language) -> TranslationResult<usize> {
        let resource = self.resource_for(language);
        let payload = self
            .cache
            .request(&resource, &RequestOptions::new())
            .await
            .map_err(|source| TranslationError::Fetch { language, source })?;

        self.merge_payload(language, &payload)
    }

    fn merge_payload(&self, language: Language, payload: &Value) -> TranslationResult<usize> {
        let dictionary = Dictionary::from_payload(payload)
            .map_err(|reason| TranslationError::InvalidPayload { language, reason })?;
        let count = dictionary.len();

        self.state
            .write()
            .dictionaries
            .entry(language)
            .or_default()
            .merge(dictionary);
        debug!("Merged {} translations for {}", count, language);
        Ok(count)
    }
}
