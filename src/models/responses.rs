//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStatsSnapshot, NamedKey};
use crate::store::MemoryStoreStats;

/// Response body for GET /cache/:namespace/:key, and one hit of a bulk get
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub namespace: String,
    pub key: String,
    /// The stored value, lossily decoded as UTF-8
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: &NamedKey, value: &[u8]) -> Self {
        Self {
            namespace: key.namespace().to_string(),
            key: String::from_utf8_lossy(key.key()).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}

/// Response body for PUT /cache/:namespace/:key
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    pub namespace: String,
    pub key: String,
    /// Whether the store acknowledged the write
    pub stored: bool,
    pub message: String,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, stored: bool) -> Self {
        let namespace = namespace.into();
        let key = key.into();
        let message = if stored {
            format!("Key '{}' stored in namespace '{}'", key, namespace)
        } else {
            format!("Key '{}' was not stored; cache writes are best-effort", key)
        };
        Self {
            namespace,
            key,
            stored,
            message,
        }
    }
}

/// Response body for POST /cache/bulk
#[derive(Debug, Clone, Serialize)]
pub struct BulkGetResponse {
    /// Keys that were found
    pub hits: Vec<GetResponse>,
    /// Number of requested keys that were not found
    pub misses: usize,
}

/// Response body for POST /namespaces/:namespace/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub namespace: String,
    /// Generation in effect after the invalidation
    pub generation: u64,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(namespace: impl Into<String>, generation: u64) -> Self {
        Self {
            namespace: namespace.into(),
            generation,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Client-side counters
    pub cache: CacheStatsSnapshot,
    /// In-memory store counters
    pub store: MemoryStoreStats,
    /// Namespaces known to the generation registry
    pub namespaces: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from client and store statistics
    pub fn new(cache: CacheStatsSnapshot, store: MemoryStoreStats, namespaces: usize) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            store,
            namespaces,
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

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let key = NamedKey::new("the", b"hi".to_vec()).unwrap();
        let resp = GetResponse::new(&key, b"value");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["namespace"], "the");
        assert_eq!(json["key"], "hi");
        assert_eq!(json["value"], "value");
    }

    #[test]
    fn test_put_response_messages() {
        let stored = PutResponse::new("ns", "my_key", true);
        assert!(stored.message.contains("my_key"));
        assert!(stored.stored);

        let dropped = PutResponse::new("ns", "my_key", false);
        assert!(dropped.message.contains("best-effort"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let cache = CacheStatsSnapshot {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        let resp = StatsResponse::new(cache, MemoryStoreStats::default(), 2);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.namespaces, 2);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
