//! Configuration loading utilities

use crate::schema::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use ugc_common::UgcError;

/// Environment variable pointing at the configuration file
pub const CONFIG_PATH_VAR: &str = "UGC_CONFIG_PATH";
/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ugc.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Name of the offending variable
        var: String,
        /// Underlying parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl From<ConfigError> for UgcError {
    fn from(err: ConfigError) -> Self {
        UgcError::config_with_source("Invalid configuration", err)
    }
}

/// Configuration loader for the application
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the usual places.
    ///
    /// `UGC_CONFIG_PATH` wins, then `ugc.toml` in the working directory, then
    /// built-in defaults. Environment overrides and validation apply in every case.
    pub fn load() -> Result<Config, ConfigError> {
        let path = env::var(CONFIG_PATH_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                candidate.exists().then_some(candidate)
            });

        let mut config = match path {
            Some(path) => Self::read_file(&path)?,
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file with environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let mut config = Self::read_file(path.as_ref())?;
        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Config, ConfigError> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `UGC_*` overrides using `lookup` to read variables
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("UGC_API_URL") {
            config.api.base_url = url;
        }

        if let Some(timeout) = lookup("UGC_API_TIMEOUT") {
            config.api.timeout_secs = parse_var("UGC_API_TIMEOUT", &timeout)?;
        }

        if let Some(ttl) = lookup("UGC_CACHE_TTL") {
            config.cache.ttl_secs = parse_var("UGC_CACHE_TTL", &ttl)?;
        }

        if let Some(language) = lookup("UGC_DEFAULT_LANGUAGE") {
            config.translations.default_language = language.trim().to_ascii_lowercase();
        }

        if let Some(file) = lookup("UGC_LANGUAGE_FILE") {
            config.persistence.file = (!file.trim().is_empty()).then(|| PathBuf::from(file));
        }

        if let Some(level) = lookup("UGC_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("UGC_LOG_FORMAT") {
            config.logging.format = format.parse().map_err(|e: UgcError| ConfigError::EnvParse {
                var: "UGC_LOG_FORMAT".to_string(),
                source: Box::new(e),
            })?;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParse {
        var: var.to_string(),
        source: Box::new(e),
    })
}
