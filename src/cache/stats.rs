//! Cache Statistics Module
//!
//! Tracks client-side outcomes: hits, misses, writes, and the store and
//! decode failures that were degraded into misses. Timeouts are counted on
//! their own as well as under the failure they caused.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Lock-free counters shared by every caller of a cache client.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    put_failures: AtomicU64,
    store_failures: AtomicU64,
    timeouts: AtomicU64,
    decode_failures: AtomicU64,
    invalidations: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    /// Keys returned with a value
    pub hits: u64,
    /// Keys returned absent, for any reason
    pub misses: u64,
    /// Writes acknowledged by the store
    pub puts: u64,
    /// Writes the store failed or timed out on
    pub put_failures: u64,
    /// Read calls that failed or timed out
    pub store_failures: u64,
    /// Store calls, reads or writes, cut off by the operation timeout
    pub timeouts: u64,
    /// Stored values that could not be decoded
    pub decode_failures: u64,
    /// Namespace generation bumps
    pub invalidations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hits(&self, count: u64) {
        self.hits.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_misses(&self, count: u64) {
        self.misses.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put_failure(&self) {
        self.put_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads every counter. Counters are independent, so a snapshot taken
    /// under load may mix values from slightly different instants.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            put_failures: self.put_failures.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl CacheStatsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
