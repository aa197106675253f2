//! Main entry point for the UGC site core.

use anyhow::Context;
use tracing::{error, info};
use ugc_common::init_logging;
use ugc_config::ConfigLoader;
use ugc_site::SiteContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = init_logging(config.logging.logging_config())?;

    info!("Starting UGC site core against {}", config.api.base_url);

    let site = SiteContext::from_config(config)?;
    site.initialize().await;

    let language = site.translations().current_language();
    info!("Interface language: {} ({})", language.display_name(), language);

    let report = site.preload_critical_data().await;
    if !report.is_complete() {
        error!("Critical data incomplete, failed: {}", report.failed.join(", "));
    }

    let stats = site.stats();
    info!(
        "Translations: language {}, ready {}, entries {:?}",
        stats.translations.current_language, stats.translations.ready, stats.translations.entries
    );
    info!(
        "Requests: {} cached, {} pending, {} failing, hit rate {:.2}",
        stats.requests.entries,
        stats.requests.pending,
        stats.requests.errors,
        site.requests().metrics().hit_rate()
    );
    info!("{}", serde_json::to_string(&stats)?);

    Ok(())
}
