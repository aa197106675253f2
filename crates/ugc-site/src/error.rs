//! Application-wide error types using thiserror.

use ugc_cache::CacheError;
use ugc_common::UgcError;
use ugc_config::ConfigError;
use ugc_i18n::TranslationError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum SiteError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fetcher, persistence or logging setup error.
    #[error(transparent)]
    Common(#[from] UgcError),

    /// Translation error.
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Content request error.
    #[error("Request error: {0}")]
    Request(#[from] CacheError),
}

/// Result type for the site application.
pub type SiteResult<T> = Result<T, SiteError>;
