//! Cache Entry Module
//!
//! Defines cache entries with TTL support and their on-disk encoding.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{CacheError, Result};

// == Ttl ==
/// Time-to-live of an entry.
///
/// Encoded as a number of milliseconds, or `null` for entries that never
/// expire. The field is always required when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Expires this many milliseconds after being stored
    Finite(u64),
    /// Never expires
    Infinite,
}

impl Ttl {
    /// Builds a ttl from an optional millisecond count, `None` meaning infinite.
    pub fn from_millis(ms: Option<u64>) -> Self {
        ms.map_or(Ttl::Infinite, Ttl::Finite)
    }

    /// Returns the millisecond count, or `None` when infinite.
    pub fn as_millis(&self) -> Option<u64> {
        match self {
            Ttl::Finite(ms) => Some(*ms),
            Ttl::Infinite => None,
        }
    }
}

impl Serialize for Ttl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_millis().serialize(serializer)
    }
}

// Goes through `Value` rather than `Option<u64>` so a missing field is an
// error instead of silently decoding as infinite.
impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Ttl::Infinite),
            Value::Number(n) => n
                .as_u64()
                .map(Ttl::Finite)
                .ok_or_else(|| de::Error::custom("ttl must be a non-negative integer")),
            other => Err(de::Error::custom(format!("invalid ttl: {}", other))),
        }
    }
}

// == Cache Entry ==
/// A stored value with the time it was written and its ttl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheEntry {
    /// The stored value
    pub item: Value,
    /// Write timestamp (Unix milliseconds)
    pub stored: u64,
    /// Time-to-live relative to `stored`
    pub ttl: Ttl,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(item: Value, ttl: Ttl) -> Self {
        Self::at(item, ttl, current_timestamp_ms())
    }

    /// Creates an entry with an explicit write timestamp.
    pub fn at(item: Value, ttl: Ttl, stored: u64) -> Self {
        Self { item, stored, ttl }
    }

    // == Liveness ==
    /// Checks whether the entry is still within its ttl at `now`.
    ///
    /// Live iff the ttl is infinite or `now - stored < ttl`. A clock that
    /// moved backwards past `stored` counts as zero elapsed time.
    pub fn is_live_at(&self, now: u64) -> bool {
        match self.ttl {
            Ttl::Infinite => true,
            Ttl::Finite(ttl) => now.saturating_sub(self.stored) < ttl,
        }
    }

    /// Checks liveness against the current time.
    pub fn is_live(&self) -> bool {
        self.is_live_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns remaining ttl in milliseconds at `now`.
    ///
    /// # Returns
    /// - `Some(0)` if the ttl has elapsed
    /// - `Some(remaining_ms)` if the entry is still live
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms_at(&self, now: u64) -> Option<u64> {
        self.ttl.as_millis().map(|ttl| {
            let elapsed = now.saturating_sub(self.stored);
            ttl.saturating_sub(elapsed)
        })
    }

    // == Encode ==
    /// Serializes the entry to its transportable byte form.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CacheError::Internal(e.to_string()))
    }

    // == Decode ==
    /// Parses an encoded entry.
    ///
    /// Truncated content, missing fields and unknown fields all fail with
    /// `CacheError::Decode`; callers treat that as a miss.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A system clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new(json!("test_value"), Ttl::Infinite);

        assert_eq!(entry.item, json!("test_value"));
        assert!(entry.is_live());
        assert!(entry.ttl_remaining_ms_at(u64::MAX).is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(json!(1), Ttl::Finite(1));

        sleep(Duration::from_millis(5));

        assert!(!entry.is_live());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::at(json!("test"), Ttl::Finite(100), 1_000);

        assert!(entry.is_live_at(1_099));
        assert!(!entry.is_live_at(1_100), "Entry should be expired at boundary");
    }

    #[test]
    fn test_zero_ttl_is_never_live() {
        let entry = CacheEntry::at(json!("test"), Ttl::Finite(0), 1_000);
        assert!(!entry.is_live_at(1_000));
    }

    #[test]
    fn test_clock_skew_counts_as_live() {
        let entry = CacheEntry::at(json!("test"), Ttl::Finite(10), 5_000);
        assert!(entry.is_live_at(4_000));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::at(json!("v"), Ttl::Finite(10_000), 1_000);

        assert_eq!(entry.ttl_remaining_ms_at(1_000), Some(10_000));
        assert_eq!(entry.ttl_remaining_ms_at(4_000), Some(7_000));
        assert_eq!(entry.ttl_remaining_ms_at(20_000), Some(0));
    }

    #[test]
    fn test_encode_format() {
        let entry = CacheEntry::at(json!({"a": [1, 2]}), Ttl::Finite(60_000), 42);
        let value: Value = serde_json::from_slice(&entry.encode().unwrap()).unwrap();

        assert_eq!(value, json!({"item": {"a": [1, 2]}, "stored": 42, "ttl": 60_000}));
    }

    #[test]
    fn test_infinite_ttl_encodes_as_null() {
        let entry = CacheEntry::at(json!("v"), Ttl::Infinite, 42);
        let value: Value = serde_json::from_slice(&entry.encode().unwrap()).unwrap();

        assert_eq!(value["ttl"], Value::Null);
    }

    #[test]
    fn test_decode_reproduces_entry() {
        let entry = CacheEntry::at(json!(["x", null, 3.5]), Ttl::Finite(7), 123);
        let decoded = CacheEntry::decode(&entry.encode().unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_decode_truncated_content() {
        let bytes = CacheEntry::new(json!("value"), Ttl::Infinite).encode().unwrap();
        let result = CacheEntry::decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_missing_ttl() {
        let result = CacheEntry::decode(br#"{"item": 1, "stored": 5}"#);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_missing_item() {
        let result = CacheEntry::decode(br#"{"stored": 5, "ttl": null}"#);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_field() {
        let result = CacheEntry::decode(br#"{"item": 1, "stored": 5, "ttl": null, "x": 0}"#);
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }
}
