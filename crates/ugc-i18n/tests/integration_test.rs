//! Integration tests for ugc-i18n.
//!
//! These tests verify lookup, fallback and language switching against a
//! scripted fetcher.

use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use ugc_common::test_utils::{init_test_logging, MockFetcher};
use ugc_common::{FetchError, FileStorage, MemoryStorage, Persistence};
use ugc_i18n::{fallback, params, Language, TranslationError, TranslationResolver};

const UK: &str = "/translations/uk/all/";
const EN: &str = "/translations/en/all/";

fn empty_fetcher() -> Arc<MockFetcher> {
    Arc::new(MockFetcher::new())
}

#[test]
fn test_fallback_available_without_network() {
    let fetcher = empty_fetcher();
    let resolver = TranslationResolver::builder(fetcher.clone()).build();

    for language in Language::all() {
        for (key, _) in fallback::pairs(language) {
            let text = resolver.translate_in(language, key, None);
            assert!(!text.is_empty());
            assert_ne!(text, *key, "{key} should resolve in {language}");
        }
    }
    assert_eq!(fetcher.total_calls(), 0);
    assert!(!resolver.is_ready());
}

#[test]
fn test_unknown_key_passthrough() {
    let resolver = TranslationResolver::builder(empty_fetcher()).build();
    assert_eq!(resolver.resolve("totally.unknown.key"), "totally.unknown.key");
}

#[tokio::test]
async fn test_cross_language_fallback() {
    let fetcher = Arc::new(MockFetcher::new().with_response(EN, json!({"translations": {}})));
    let resolver = TranslationResolver::builder(fetcher).build();
    resolver.add_translations(Language::Ukrainian, [("footer.address", "Київ, вул. Швейна 1")]);

    resolver.change_language(Language::English).await.unwrap();

    assert_eq!(resolver.resolve("footer.address"), "Київ, вул. Швейна 1");
}

#[test]
fn test_placeholder_substitution() {
    let resolver = TranslationResolver::builder(empty_fetcher()).build();
    resolver.add_translations(Language::Ukrainian, [("greeting", "Hello {{name}}")]);

    assert_eq!(
        resolver.resolve_with("greeting", &params! { "name" => "World" }),
        "Hello World"
    );
    assert_eq!(resolver.resolve("greeting"), "Hello {{name}}");
}

#[tokio::test]
async fn test_listener_notified_once_per_switch() {
    let fetcher = Arc::new(MockFetcher::new().with_response(EN, json!({})));
    let resolver = TranslationResolver::builder(fetcher).build();

    let calls = Arc::new(AtomicUsize::new(0));
    let listener = {
        let calls = Arc::clone(&calls);
        resolver.on_language_change(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    assert!(!resolver.add_language_change_listener(Arc::clone(&listener)));

    resolver.change_language(Language::English).await.unwrap();
    resolver.change_language(Language::English).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(resolver.remove_language_change_listener(&listener));
    assert!(!resolver.remove_language_change_listener(&listener));
    resolver.change_language(Language::Ukrainian).await.ok();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_listener_sees_new_language_before_download_finishes() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_response(EN, json!({"nav": {"home": "Home page"}}))
            .with_delay(Duration::from_millis(30)),
    );
    let resolver = TranslationResolver::builder(fetcher).build();

    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        let observer = Arc::downgrade(&resolver);
        resolver.on_language_change(move |language| {
            if let Some(resolver) = observer.upgrade() {
                seen.lock().push((language, resolver.current_language(), resolver.resolve("nav.home")));
            }
        });
    }

    resolver.change_language(Language::English).await.unwrap();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (Language::English, Language::English, "Home".to_string()));
    drop(seen);
    assert_eq!(resolver.resolve("nav.home"), "Home page");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_switches_notify_in_commit_order() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_response(UK, json!({}))
            .with_response(EN, json!({})),
    );
    let resolver = TranslationResolver::builder(fetcher).build();

    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        let observer = Arc::downgrade(&resolver);
        resolver.on_language_change(move |language| {
            // A slow re-render, still running when the second switch arrives
            if language == Language::English {
                std::thread::sleep(Duration::from_millis(200));
            }
            if let Some(resolver) = observer.upgrade() {
                seen.lock().push((language, resolver.current_language()));
            }
        });
    }

    let to_english = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.change_language(Language::English).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let to_ukrainian = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.change_language(Language::Ukrainian).await })
    };

    assert_ok!(to_english.await.unwrap());
    assert_ok!(to_ukrainian.await.unwrap());

    let seen = seen.lock().clone();
    assert_eq!(
        seen,
        vec![
            (Language::English, Language::English),
            (Language::Ukrainian, Language::Ukrainian),
        ]
    );
    assert_eq!(seen.last().map(|(told, _)| *told), Some(resolver.current_language()));
}

#[tokio::test]
async fn test_end_to_end_uk_to_en() {
    init_test_logging();
    let fetcher = empty_fetcher();
    let resolver = TranslationResolver::builder(fetcher.clone())
        .locale_hint("uk-UA")
        .build();

    assert_eq!(resolver.current_language(), Language::Ukrainian);
    assert_eq!(resolver.resolve("nav.home"), "Головна");

    // The server has nothing: the switch holds and the built-in strings answer
    let err = resolver.change_language(Language::English).await.unwrap_err();
    assert!(matches!(err, TranslationError::LanguageSwitch { language: Language::English, .. }));
    assert_eq!(resolver.current_language(), Language::English);
    assert_eq!(resolver.resolve("nav.home"), "Home");
    assert_eq!(fetcher.call_count(EN), 1);
}

#[tokio::test]
async fn test_initialize_merges_over_fallback() {
    let fetcher = Arc::new(MockFetcher::new().with_response(
        UK,
        json!({"success": true, "data": {"translations": {"nav": {"home": "Головна сторінка"}, "jobs.apply": "Подати заявку"}}}),
    ));
    let resolver = TranslationResolver::builder(fetcher).build();

    assert_ok!(resolver.initialize().await);

    assert!(resolver.is_ready());
    assert_eq!(resolver.resolve("nav.home"), "Головна сторінка");
    assert_eq!(resolver.resolve("jobs.apply"), "Подати заявку");
    assert_eq!(resolver.resolve("common.error"), "Помилка");
}

#[tokio::test]
async fn test_failed_initialize_still_ready() {
    let fetcher = Arc::new(MockFetcher::new().with_failure(UK, FetchError::status(503, "Service Unavailable")));
    let resolver = TranslationResolver::builder(fetcher).build();

    let err = assert_err!(resolver.initialize().await);

    assert!(matches!(err, TranslationError::Fetch { language: Language::Ukrainian, .. }));
    assert!(resolver.is_ready());
    assert_eq!(resolver.resolve("common.retry"), "Спробувати знову");
}

#[tokio::test]
async fn test_invalid_payload_is_reported() {
    let fetcher = Arc::new(MockFetcher::new().with_response(UK, json!(["not", "a", "dictionary"])));
    let resolver = TranslationResolver::builder(fetcher).build();

    let err = resolver.initialize().await.unwrap_err();
    assert!(matches!(err, TranslationError::InvalidPayload { .. }));
    assert_eq!(resolver.resolve("nav.home"), "Головна");
}

#[tokio::test]
async fn test_switch_reuses_downloaded_dictionary() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_response(UK, json!({}))
            .with_response(EN, json!({"nav.home": "Home"})),
    );
    let resolver = TranslationResolver::builder(fetcher.clone()).build();

    resolver.change_language(Language::English).await.unwrap();
    resolver.change_language(Language::Ukrainian).await.unwrap();
    resolver.change_language(Language::English).await.unwrap();

    assert_eq!(fetcher.call_count(EN), 1);
}

#[tokio::test]
async fn test_concurrent_loads_are_coalesced() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_response(UK, json!({"nav.home": "Головна"}))
            .with_delay(Duration::from_millis(20)),
    );
    let resolver = TranslationResolver::builder(fetcher.clone()).build();

    let (a, b) = tokio::join!(resolver.initialize(), resolver.initialize());
    a.unwrap();
    b.unwrap();
    assert_eq!(fetcher.call_count(UK), 1);
}

#[tokio::test]
async fn test_refresh_refetches_and_notifies() {
    let fetcher = Arc::new(MockFetcher::new().with_response(UK, json!({"hero.title": "Старий заголовок"})));
    let resolver = TranslationResolver::builder(fetcher.clone()).build();
    resolver.initialize().await.unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    {
        let calls = Arc::clone(&calls);
        resolver.on_language_change(move |language| {
            assert_eq!(language, Language::Ukrainian);
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    fetcher.set_response(UK, json!({"hero.title": "Новий заголовок"}));
    resolver.refresh().await.unwrap();

    assert_eq!(fetcher.call_count(UK), 2);
    assert_eq!(resolver.resolve("hero.title"), "Новий заголовок");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    fetcher.set_failure(UK, FetchError::Network("offline".into()));
    assert!(resolver.refresh().await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(resolver.resolve("hero.title"), "Новий заголовок");
}

#[tokio::test]
async fn test_refresh_does_not_reuse_download_in_flight() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_response(UK, json!({"hero.title": "Старий заголовок"}))
            .with_delay(Duration::from_millis(50)),
    );
    let resolver = TranslationResolver::builder(fetcher.clone()).build();

    let initializing = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.initialize().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    fetcher.set_response(UK, json!({"hero.title": "Новий заголовок"}));
    assert_ok!(resolver.refresh().await);
    assert_ok!(initializing.await.unwrap());

    assert_eq!(fetcher.call_count(UK), 2);
    assert_eq!(resolver.resolve("hero.title"), "Новий заголовок");
}

#[tokio::test]
async fn test_language_choice_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let fetcher = Arc::new(MockFetcher::new().with_response(EN, json!({})));

    let first = TranslationResolver::builder(fetcher.clone())
        .persistence(Arc::new(FileStorage::new(&path)))
        .build();
    first.change_language(Language::English).await.unwrap();

    let storage = Arc::new(FileStorage::new(&path));
    assert_eq!(storage.get_item("ugc.language").as_deref(), Some("en"));

    let second = TranslationResolver::builder(fetcher)
        .persistence(storage)
        .locale_hint("uk-UA")
        .build();
    assert_eq!(second.current_language(), Language::English);
}

#[tokio::test]
async fn test_clear_cache_returns_to_fallback() {
    let fetcher = Arc::new(MockFetcher::new().with_response(UK, json!({"nav.home": "Головна сторінка"})));
    let resolver = TranslationResolver::builder(fetcher.clone())
        .persistence(Arc::new(MemoryStorage::new()))
        .build();
    resolver.initialize().await.unwrap();
    assert_eq!(resolver.resolve("nav.home"), "Головна сторінка");

    resolver.clear_cache();
    assert_eq!(resolver.resolve("nav.home"), "Головна");

    resolver.initialize().await.unwrap();
    assert_eq!(fetcher.call_count(UK), 2);
}

#[tokio::test]
async fn test_stats() {
    let fetcher = Arc::new(MockFetcher::new().with_response(UK, json!({"extra.key": "Додатково"})));
    let resolver = TranslationResolver::builder(fetcher).build();
    resolver.initialize().await.unwrap();

    let stats = resolver.stats();
    assert!(stats.ready);
    assert_eq!(stats.current_language, Language::Ukrainian);
    assert_eq!(stats.entries[&Language::Ukrainian], fallback::pairs(Language::Ukrainian).len() + 1);
    assert_eq!(stats.entries[&Language::English], fallback::pairs(Language::English).len());
    assert_eq!(stats.cache.entries, 1);
    assert_eq!(resolver.available_languages(), vec![Language::Ukrainian, Language::English]);
}
