//! Error types for translation operations

use crate::language::Language;
use thiserror::Error;
use ugc_cache::CacheError;

/// Errors that can occur while loading dictionaries or switching language
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The language code is not one the site is translated into
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Downloading a dictionary failed; the existing dictionary stays in use
    #[error("Failed to load translations for {language}: {source}")]
    Fetch {
        language: Language,
        #[source]
        source: CacheError,
    },

    /// The explicit switch took effect but its dictionary could not be loaded
    #[error("Switched to {language} but its translations could not be loaded: {source}")]
    LanguageSwitch {
        language: Language,
        #[source]
        source: Box<TranslationError>,
    },

    /// The server answered with something that is not a dictionary
    #[error("Invalid translations payload for {language}: {reason}")]
    InvalidPayload { language: Language, reason: String },
}

impl TranslationError {
    /// Language the failure relates to, when known
    pub fn language(&self) -> Option<Language> {
        match self {
            Self::UnsupportedLanguage(_) => None,
            Self::Fetch { language, .. }
            | Self::LanguageSwitch { language, .. }
            | Self::InvalidPayload { language, .. } => Some(*language),
        }
    }
}

/// Result type for translation operations
pub type TranslationResult<T> = Result<T, TranslationError>;
