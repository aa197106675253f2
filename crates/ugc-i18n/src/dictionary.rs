//! Per-language dictionaries and placeholder substitution

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Named values substituted into `{{name}}` placeholders
pub type Params = HashMap<String, String>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is a valid regex"));

/// Mapping from dot-delimited key to template for one language.
///
/// Empty templates count as missing: they are never stored, so a lookup falls
/// through to the next language instead of rendering nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from static `(key, template)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut dictionary = Self::new();
        for (key, template) in pairs {
            dictionary.insert(*key, *template);
        }
        dictionary
    }

    /// Build a dictionary from a server payload.
    ///
    /// Accepts a flat or nested object, optionally wrapped as
    /// `{ "translations": { ... } }`. Nested objects become dot-delimited keys;
    /// numbers and booleans are stored as text, other values are skipped.
    pub fn from_payload(payload: &Value) -> Result<Self, String> {
        let object = match payload {
            Value::Object(map) => match map.get("translations") {
                Some(Value::Object(inner)) => inner,
                _ => map,
            },
            Value::Null => return Err("payload is empty".to_string()),
            other => return Err(format!("expected an object, got {}", type_name(other))),
        };

        let mut dictionary = Self::new();
        dictionary.flatten_into("", object);
        Ok(dictionary)
    }

    fn flatten_into(&mut self, prefix: &str, object: &Map<String, Value>) {
        for (key, value) in object {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::String(text) => self.insert(path, text.clone()),
                Value::Number(number) => self.insert(path, number.to_string()),
                Value::Bool(flag) => self.insert(path, flag.to_string()),
                Value::Object(nested) => self.flatten_into(&path, nested),
                Value::Null | Value::Array(_) => {}
            }
        }
    }

    /// Insert one template; empty templates are ignored
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        let template = template.into();
        if !template.is_empty() {
            self.entries.insert(key.into(), template);
        }
    }

    /// Merge `other` over this dictionary, overwriting shared keys
    pub fn merge(&mut self, other: Dictionary) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace every `{{name}}` in `template` with `params[name]`.
///
/// Placeholders without a matching parameter are left as they are.
pub fn interpolate(template: &str, params: Option<&Params>) -> String {
    let Some(params) = params.filter(|p| !p.is_empty()) else {
        return template.to_string();
    };

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build [`Params`] for [`TranslationResolver::resolve_with`](crate::TranslationResolver::resolve_with).
///
/// ```rust
/// use ugc_i18n::params;
///
/// let params = params! { "name" => "World", "count" => 3 };
/// assert_eq!(params["count"], "3");
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert($key.to_string(), $value.to_string());
        )+
        params
    }};
}
