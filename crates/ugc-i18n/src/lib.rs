//! Translation support for the UGC site
//!
//! This crate resolves dot-delimited keys to display text. It includes:
//!
//! - Built-in dictionaries for every supported language
//! - Downloaded dictionaries merged over the built-in ones
//! - Cross-language fallback to the default language
//! - `{{name}}` placeholder substitution
//! - Persisted language choice and change notification
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ugc_common::{HttpFetcher, HttpFetcherConfig};
//! use ugc_i18n::{params, Language, TranslationResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Arc::new(HttpFetcher::new(HttpFetcherConfig::default())?);
//! let resolver = TranslationResolver::builder(fetcher).locale_hint("uk-UA").build();
//!
//! println!("{}", resolver.resolve("nav.home"));
//! resolver.change_language(Language::English).await?;
//! println!("{}", resolver.resolve_with("contact.form.success", &params! { "name" => "Olena" }));
//! # Ok(())
//! # }
//! ```

pub mod dictionary;
pub mod error;
pub mod fallback;
pub mod language;
pub mod listeners;
pub mod resolver;

pub use dictionary::{interpolate, Dictionary, Params};
pub use error::{TranslationError, TranslationResult};
pub use language::Language;
pub use listeners::{LanguageListener, ListenerSet};
pub use resolver::{TranslationResolver, TranslationResolverBuilder, TranslationStats};
