//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::cache::{CacheKey, Ttl};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `segment`: Optional segment, defaults to the cache's configured segment
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in milliseconds. Omitted uses the configured default,
///   `null` stores the value without expiry
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Optional key segment
    #[serde(default)]
    pub segment: Option<String>,
    /// The value to store
    pub value: Value,
    /// Outer `None` when omitted, inner `None` for an explicit `null`
    #[serde(default, deserialize_with = "present_or_null")]
    pub ttl: Option<Option<u64>>,
}

/// Keeps `null` distinct from a missing field; serde only calls this when
/// the field is present.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Some)
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.segment.as_deref() == Some("") {
            return Some("Segment cannot be empty".to_string());
        }
        None
    }

    pub fn cache_key(&self) -> CacheKey {
        key_with_segment(&self.key, self.segment.as_deref())
    }

    pub fn ttl(&self) -> Option<Ttl> {
        self.ttl.map(Ttl::from_millis)
    }
}

/// Query string shared by GET /get, GET /has and DELETE /del
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    /// Optional key segment
    #[serde(default)]
    pub segment: Option<String>,
}

impl KeyQuery {
    pub fn cache_key(&self, key: &str) -> CacheKey {
        key_with_segment(key, self.segment.as_deref())
    }
}

fn key_with_segment(key: &str, segment: Option<&str>) -> CacheKey {
    match segment {
        Some(segment) => CacheKey::scoped(key, segment),
        None => CacheKey::from(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "hello"}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, json!("hello"));
        assert!(req.ttl().is_none());
        assert_eq!(req.cache_key(), CacheKey::from("test"));
    }

    #[test]
    fn test_set_request_with_segment_and_ttl() {
        let json = r#"{"key": "test", "segment": "users", "value": {"a": 1}, "ttl": 60000}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl(), Some(Ttl::Finite(60_000)));
        assert_eq!(req.cache_key(), CacheKey::scoped("test", "users"));
    }

    #[test]
    fn test_set_request_null_ttl_is_infinite() {
        let json = r#"{"key": "test", "value": 1, "ttl": null}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(None));
        assert_eq!(req.ttl(), Some(Ttl::Infinite));
    }

    #[test]
    fn test_set_request_rejects_negative_ttl() {
        let json = r#"{"key": "test", "value": 1, "ttl": -5}"#;
        assert!(serde_json::from_str::<SetRequest>(json).is_err());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            segment: None,
            value: json!("test"),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_empty_segment() {
        let req = SetRequest {
            key: "k".to_string(),
            segment: Some(String::new()),
            value: json!("test"),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            segment: None,
            value: json!([1, 2, 3]),
            ttl: Some(Some(60)),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_key_query_without_segment() {
        assert_eq!(KeyQuery::default().cache_key("k"), CacheKey::from("k"));
    }
}
