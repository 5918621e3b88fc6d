//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Memcached's hard limit on key length.
pub const MEMCACHED_MAX_KEY_LENGTH: usize = 250;

/// Construction parameters for a [`crate::cache::NamespacedCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Prefix that separates this logical cache from others sharing a store
    pub prefix: String,
    /// Expiry applied by `put`
    pub default_expiry: Duration,
    /// Payloads larger than this many bytes are compressed
    pub compression_threshold: usize,
    /// Upper bound on composite key length
    pub max_key_length: usize,
    /// Bound on every remote store call
    pub operation_timeout: Duration,
}

impl CacheConfig {
    /// Creates a config with the given prefix and default everything else.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: "nscache".to_string(),
            default_expiry: Duration::from_secs(3600),
            compression_threshold: 1024,
            max_key_length: MEMCACHED_MAX_KEY_LENGTH,
            operation_timeout: Duration::from_millis(500),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Composite key prefix
    pub prefix: String,
    /// Default expiry in seconds for stored entries
    pub default_expiry: u64,
    /// Payload size in bytes above which values are compressed
    pub compression_threshold: usize,
    /// Maximum composite key length
    pub max_key_length: usize,
    /// Timeout in milliseconds for each store operation
    pub operation_timeout_ms: u64,
    /// Maximum number of entries held by the in-memory store
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PREFIX` - Composite key prefix (default: nscache)
    /// - `DEFAULT_EXPIRY` - Entry expiry in seconds (default: 3600)
    /// - `COMPRESSION_THRESHOLD` - Compression threshold in bytes (default: 1024)
    /// - `MAX_KEY_LENGTH` - Composite key cap (default: 250)
    /// - `OPERATION_TIMEOUT_MS` - Store call timeout (default: 500)
    /// - `MAX_ENTRIES` - In-memory store capacity (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            prefix: env::var("CACHE_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.prefix),
            default_expiry: env_or("DEFAULT_EXPIRY", defaults.default_expiry),
            compression_threshold: env_or("COMPRESSION_THRESHOLD", defaults.compression_threshold),
            max_key_length: env_or("MAX_KEY_LENGTH", defaults.max_key_length),
            operation_timeout_ms: env_or("OPERATION_TIMEOUT_MS", defaults.operation_timeout_ms),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Derives the cache client's construction parameters.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            prefix: self.prefix.clone(),
            default_expiry: Duration::from_secs(self.default_expiry),
            compression_threshold: self.compression_threshold,
            max_key_length: self.max_key_length,
            operation_timeout: Duration::from_millis(self.operation_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "nscache".to_string(),
            default_expiry: 3600,
            compression_threshold: 1024,
            max_key_length: MEMCACHED_MAX_KEY_LENGTH,
            operation_timeout_ms: 500,
            max_entries: 10_000,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.prefix, "nscache");
        assert_eq!(config.default_expiry, 3600);
        assert_eq!(config.compression_threshold, 1024);
        assert_eq!(config.max_key_length, 250);
        assert_eq!(config.operation_timeout_ms, 500);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "CACHE_PREFIX",
            "DEFAULT_EXPIRY",
            "COMPRESSION_THRESHOLD",
            "MAX_KEY_LENGTH",
            "OPERATION_TIMEOUT_MS",
            "MAX_ENTRIES",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.prefix, "nscache");
        assert_eq!(config.default_expiry, 3600);
        assert_eq!(config.operation_timeout_ms, 500);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_cache_config_derivation() {
        let config = Config {
            prefix: "druid".to_string(),
            default_expiry: 60,
            operation_timeout_ms: 250,
            ..Config::default()
        };

        let cache_config = config.cache_config();
        assert_eq!(cache_config.prefix, "druid");
        assert_eq!(cache_config.default_expiry, Duration::from_secs(60));
        assert_eq!(cache_config.operation_timeout, Duration::from_millis(250));
        assert_eq!(cache_config.max_key_length, MEMCACHED_MAX_KEY_LENGTH);
    }

    #[test]
    fn test_cache_config_with_prefix() {
        let config = CacheConfig::with_prefix("test");
        assert_eq!(config.prefix, "test");
        assert_eq!(config.compression_threshold, 1024);
    }
}
