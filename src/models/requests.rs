//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies. Raw keys and
//! values travel as strings and are stored as their UTF-8 bytes.

use serde::Deserialize;

use crate::cache::NamedKey;
use crate::error::{CacheError, Result};

/// Request body for PUT /cache/:namespace/:key
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The value to store
    pub value: String,
    /// Optional expiry in seconds (uses the configured default if not specified)
    #[serde(default)]
    pub expiry: Option<u64>,
}

/// One namespaced key inside a bulk request.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRequest {
    pub namespace: String,
    pub key: String,
}

impl KeyRequest {
    /// Converts into a cache key, rejecting an empty namespace.
    pub fn to_named_key(&self) -> Result<NamedKey> {
        NamedKey::new(self.namespace.as_str(), self.key.as_bytes())
    }
}

/// Request body for POST /cache/bulk
#[derive(Debug, Clone, Deserialize)]
pub struct BulkGetRequest {
    pub keys: Vec<KeyRequest>,
}

impl BulkGetRequest {
    /// Maximum number of keys accepted in one bulk request
    pub const MAX_KEYS: usize = 1000;

    /// Validates the request and converts every entry to a cache key.
    pub fn named_keys(&self) -> Result<Vec<NamedKey>> {
        if self.keys.len() > Self::MAX_KEYS {
            return Err(CacheError::InvalidRequest(format!(
                "bulk request has {} keys, maximum is {}",
                self.keys.len(),
                Self::MAX_KEYS
            )));
        }
        self.keys.iter().map(KeyRequest::to_named_key).collect()
    }
}
