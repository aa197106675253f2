//! Warm-up of the content every first page render needs.

use crate::resources::Resource;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};
use ugc_cache::RequestCache;
use ugc_common::RequestOptions;
use ugc_i18n::TranslationResolver;

/// Outcome of [`preload_critical_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Requests that succeeded.
    pub successful: usize,
    /// Requests issued.
    pub total: usize,
    /// Resource ids that failed.
    pub failed: Vec<String>,
}

impl PreloadReport {
    /// Whether every request succeeded.
    pub fn is_complete(&self) -> bool {
        self.successful == self.total
    }
}

/// Request the critical resources and the default-language dictionary
/// concurrently, waiting for every request to settle.
pub async fn preload_critical_data(
    cache: &RequestCache,
    translations: &TranslationResolver,
) -> PreloadReport {
    let options = RequestOptions::new();
    let content = Resource::critical().into_iter().map(|resource| {
        let options = &options;
        async move {
            let path = resource.path();
            let outcome = cache.request(&path, options).await.map(|_| ());
            (path, outcome.map_err(|e| e.to_string()))
        }
    });

    let default_language = translations.default_language();
    let (content, dictionary) = tokio::join!(
        join_all(content),
        translations.preload(default_language)
    );

    let mut report = PreloadReport::default();
    let dictionary = (
        translations.resource_for(default_language),
        dictionary.map(|_| ()).map_err(|e| e.to_string()),
    );

    for (path, outcome) in content.into_iter().chain(std::iter::once(dictionary)) {
        report.total += 1;
        match outcome {
            Ok(()) => report.successful += 1,
            Err(e) => {
                warn!("Preload of {} failed: {}", path, e);
                report.failed.push(path);
            }
        }
    }

    info!("Preloaded {}/{} critical resources", report.successful, report.total);
    report
}
