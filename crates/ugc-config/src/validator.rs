//! Runtime validation of a loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;
use url::Url;

impl Config {
    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        match Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => problems.push(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => problems.push(format!("api.base_url '{}' is invalid: {e}", self.api.base_url)),
        }
        if self.api.timeout_secs == 0 {
            problems.push("api.timeout_secs must be greater than 0".to_string());
        }

        if self.cache.ttl_secs == 0 {
            problems.push("cache.ttl_secs must be greater than 0".to_string());
        }
        if self.cache.max_capacity == 0 {
            problems.push("cache.max_capacity must be greater than 0".to_string());
        }

        if !is_language_code(&self.translations.default_language) {
            problems.push(format!(
                "translations.default_language '{}' is not a two-letter language code",
                self.translations.default_language
            ));
        }
        if !self.translations.resource_template.contains("{lang}") {
            problems.push("translations.resource_template must contain '{lang}'".to_string());
        }
        if self.translations.ttl_secs == Some(0) {
            problems.push("translations.ttl_secs must be greater than 0 when set".to_string());
        }

        if self.persistence.language_key.trim().is_empty() {
            problems.push("persistence.language_key must not be empty".to_string());
        }

        if self.logging.level.trim().is_empty() {
            problems.push("logging.level must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }
}

fn is_language_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase())
}
