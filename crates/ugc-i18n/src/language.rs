//! Supported languages and host locale matching

use crate::error::TranslationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Languages the site is translated into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    #[serde(rename = "uk")]
    Ukrainian,
    #[serde(rename = "en")]
    English,
}

impl Default for Language {
    fn default() -> Self {
        Self::Ukrainian
    }
}

impl Language {
    /// Two-letter code used in resource ids and persisted preferences
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ukrainian => "uk",
            Self::English => "en",
        }
    }

    /// Name of the language in that language
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ukrainian => "Українська",
            Self::English => "English",
        }
    }

    /// Parse a two-letter code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "uk" => Some(Self::Ukrainian),
            "en" => Some(Self::English),
            _ => None,
        }
    }

    /// Nearest supported language for a host locale such as `en-US` or `uk_UA`
    pub fn from_locale_hint(hint: &str) -> Option<Self> {
        let langid = hint.trim().parse::<LanguageIdentifier>().ok()?;
        Self::from_code(langid.language.as_str())
    }

    /// Get all supported languages
    pub fn all() -> Vec<Self> {
        vec![Self::Ukrainian, Self::English]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| TranslationError::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for language in Language::all() {
            assert_eq!(Language::from_code(language.code()), Some(language));
        }
        assert_eq!(Language::from_code(" EN "), Some(Language::English));
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn test_locale_hints() {
        assert_eq!(Language::from_locale_hint("en-US"), Some(Language::English));
        assert_eq!(Language::from_locale_hint("en_GB"), Some(Language::English));
        assert_eq!(Language::from_locale_hint("uk-UA"), Some(Language::Ukrainian));
        assert_eq!(Language::from_locale_hint("fr-FR"), None);
        assert_eq!(Language::from_locale_hint(""), None);
    }

    #[test]
    fn test_display_names_are_native() {
        assert_eq!(Language::Ukrainian.display_name(), "Українська");
        assert_eq!(Language::English.display_name(), "English");
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "pl".parse::<Language>().unwrap_err();
        assert!(matches!(err, TranslationError::UnsupportedLanguage(code) if code == "pl"));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Ukrainian).unwrap(), "\"uk\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::English);
    }
}
