//! The fetcher capability and the response envelopes it hands back
//!
//! The content API answers in three shapes: a `{ success, data, message }`
//! wrapper, a paginated `{ results: [...] }` page, or a bare object/array.
//! [`RawResponse`] models the three as one enum and [`RawResponse::into_payload`]
//! collapses them to the payload callers actually want.

use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Normalized response body shared between every caller of a request
pub type Payload = Arc<Value>;

/// Options attached to a request (method, body, query parameters, ...)
///
/// Stored in an ordered map so two option sets with the same entries always
/// produce the same [`signature`](Self::signature), whatever order they were
/// built in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    entries: BTreeMap<String, Value>,
}

impl RequestOptions {
    /// Empty options: a plain GET
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary option
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Set the HTTP method
    pub fn with_method(self, method: impl Into<String>) -> Self {
        self.with("method", method.into())
    }

    /// Set a JSON body
    pub fn with_body(self, body: Value) -> Self {
        self.with("body", body)
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let query = self
            .entries
            .entry("query".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !query.is_object() {
            *query = Value::Object(Map::new());
        }
        if let Value::Object(map) = query {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Look up a raw option
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// HTTP method, `GET` unless set
    pub fn method(&self) -> &str {
        self.entries
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET")
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        self.entries.get("body")
    }

    /// Query parameters rendered as strings, sorted by name
    pub fn query(&self) -> Vec<(String, String)> {
        let Some(Value::Object(map)) = self.entries.get("query") else {
            return Vec::new();
        };
        let mut pairs: Vec<(String, String)> = map
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect();
        pairs.sort();
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable serialization of these options, used as part of cache keys.
    ///
    /// Object keys are emitted in sorted order at every nesting level.
    pub fn signature(&self) -> String {
        let mut out = String::from("{");
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&Value::String(key.clone()).to_string());
            out.push(':');
            write_canonical(value, &mut out);
        }
        out.push('}');
        out
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, nested)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(nested, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// A response body as the content API sent it
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// `{ "success": bool, "data": ..., "message": "..." }`
    Envelope {
        success: bool,
        data: Option<Value>,
        message: Option<String>,
    },
    /// `{ "count": n, "next": url, "results": [...] }`
    Paginated {
        results: Vec<Value>,
        count: Option<u64>,
        next: Option<String>,
    },
    /// Anything else, taken as the payload itself
    Bare(Value),
}

impl RawResponse {
    /// Classify a decoded JSON body
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Self::Bare(other),
        };

        if let Some(Value::Bool(success)) = map.get("success").cloned() {
            let data = map.remove("data").filter(|data| !data.is_null());
            let message = map
                .remove("message")
                .and_then(|message| message.as_str().map(str::to_owned));
            return Self::Envelope {
                success,
                data,
                message,
            };
        }

        if let Some(Value::Array(_)) = map.get("results") {
            if let Some(Value::Array(results)) = map.remove("results") {
                return Self::Paginated {
                    results,
                    count: map.get("count").and_then(Value::as_u64),
                    next: map.get("next").and_then(Value::as_str).map(str::to_owned),
                };
            }
        }

        Self::Bare(Value::Object(map))
    }

    /// Collapse the envelope to its payload.
    ///
    /// An envelope with `success: false` becomes [`FetchError::Api`].
    pub fn into_payload(self) -> Result<Value, FetchError> {
        match self {
            Self::Envelope {
                success: true,
                data,
                ..
            } => Ok(data.unwrap_or(Value::Null)),
            Self::Envelope {
                success: false,
                message,
                ..
            } => Err(FetchError::Api(
                message.unwrap_or_else(|| "API Error".to_string()),
            )),
            Self::Paginated { results, .. } => Ok(Value::Array(results)),
            Self::Bare(value) => Ok(value),
        }
    }

    /// Short name of the envelope kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Envelope { .. } => "envelope",
            Self::Paginated { .. } => "paginated",
            Self::Bare(_) => "bare",
        }
    }
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Performs the actual network call for a resource.
///
/// Supplied by the hosting application; the caches in this workspace never
/// talk to the network directly.
#[async_trait]
pub trait Fetcher: Send + Sync + fmt::Debug {
    /// Fetch `resource_id` with the given options
    async fn fetch(
        &self,
        resource_id: &str,
        options: &RequestOptions,
    ) -> Result<RawResponse, FetchError>;
}
