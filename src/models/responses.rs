//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, Location};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// Segment the key resolved to
    pub segment: String,
    /// The stored value
    pub value: Value,
    /// Write timestamp (Unix milliseconds)
    pub stored: u64,
    /// TTL in milliseconds, null when the entry never expires
    pub ttl: Option<u64>,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(location: &Location, entry: CacheEntry) -> Self {
        Self {
            key: location.id().to_string(),
            segment: location.segment().to_string(),
            value: entry.item,
            stored: entry.stored,
            ttl: entry.ttl.as_millis(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the HAS operation (GET /has/:key)
#[derive(Debug, Clone, Serialize)]
pub struct HasResponse {
    pub key: String,
    /// Whether a live entry exists
    pub present: bool,
}

/// One entry of the keys listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyItem {
    pub segment: String,
    pub id: String,
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<KeyItem>,
}

impl KeysResponse {
    pub fn new(locations: Vec<Location>) -> Self {
        let keys = locations
            .into_iter()
            .map(|l| KeyItem {
                segment: l.segment().to_string(),
                id: l.id().to_string(),
            })
            .collect();
        Self { keys }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups answered from memory
    pub memory_hits: u64,
    /// Lookups answered from disk
    pub persistent_hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Entries held in memory
    pub memory_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            memory_hits: stats.memory_hits,
            persistent_hits: stats.persistent_hits,
            misses: stats.misses,
            memory_entries: stats.memory_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Ttl;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let entry = CacheEntry::at(json!({"n": 1}), Ttl::Infinite, 42);
        let resp = GetResponse::new(&Location::new("s", "test_key"), entry);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(
            json,
            json!({"key": "test_key", "segment": "s", "value": {"n": 1}, "stored": 42, "ttl": null})
        );
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("deleted_key"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_keys_response_decodes_locations() {
        let resp = KeysResponse::new(vec![Location::new("a:b", "c d")]);
        assert_eq!(
            resp.keys,
            vec![KeyItem {
                segment: "a:b".to_string(),
                id: "c d".to_string()
            }]
        );
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let resp = StatsResponse::from(CacheStats {
            memory_hits: 60,
            persistent_hits: 20,
            misses: 20,
            memory_entries: 5,
        });
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
