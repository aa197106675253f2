//! Cache keys for requests

use serde::Serialize;
use std::fmt;
use ugc_common::RequestOptions;

/// Identity of a request: resource id plus canonical options signature.
///
/// Two requests with the same resource and the same options, in any order,
/// map to the same key.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
pub struct CacheKey {
    resource_id: String,
    signature: String,
}

impl CacheKey {
    pub fn new(resource_id: impl Into<String>, options: &RequestOptions) -> Self {
        Self {
            resource_id: resource_id.into(),
            signature: options.signature(),
        }
    }

    /// Key for a plain request without options
    pub fn for_resource(resource_id: impl Into<String>) -> Self {
        Self::new(resource_id, &RequestOptions::new())
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether the resource id starts with `prefix`
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.resource_id.starts_with(prefix)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.resource_id, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_display() {
        let key = CacheKey::new("/projects/", &RequestOptions::new().with_query("page", 2));
        assert_eq!(key.to_string(), r#"/projects/_{"query":{"page":2}}"#);
        assert_eq!(CacheKey::for_resource("/services/").to_string(), "/services/_{}");
    }

    #[test]
    fn test_options_distinguish_keys() {
        let first = CacheKey::new("/projects/", &RequestOptions::new().with_query("page", 1));
        let second = CacheKey::new("/projects/", &RequestOptions::new().with_query("page", 2));
        assert_ne!(first, second);
        assert!(first.matches_prefix("/projects"));
        assert!(!first.matches_prefix("/services"));
    }

    proptest! {
        #[test]
        fn prop_query_order_does_not_change_key(
            params in proptest::collection::btree_map("[a-z]{1,8}", 0i64..1000, 1..6)
        ) {
            let forward = params
                .iter()
                .fold(RequestOptions::new(), |opts, (k, v)| opts.with_query(k.clone(), *v));
            let backward = params
                .iter()
                .rev()
                .fold(RequestOptions::new(), |opts, (k, v)| opts.with_query(k.clone(), *v));

            prop_assert_eq!(
                CacheKey::new("/services/", &forward),
                CacheKey::new("/services/", &backward)
            );
        }
    }
}
