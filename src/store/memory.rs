//! In-Memory Store Module
//!
//! A memcached-like `RemoteStore`: bounded entry count with LRU eviction
//! and per-entry expiry. Serves the HTTP binary and tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::{LruTracker, RemoteStore, StoredEntry, MAX_VALUE_SIZE};
use crate::cache::CompositeKey;
use crate::error::StoreError;

// == Memory Store Stats ==
/// Store-side counters, separate from the client's hit/miss view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStoreStats {
    /// Keys found across single and bulk reads
    pub hits: u64,
    /// Keys missing or expired across single and bulk reads
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Number of `set` calls
    pub sets: u64,
    /// Number of single-key `get` calls
    pub gets: u64,
    /// Number of `get_bulk` calls
    pub bulk_gets: u64,
    /// Current number of entries
    pub total_entries: usize,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<CompositeKey, StoredEntry>,
    lru: LruTracker<CompositeKey>,
    stats: MemoryStoreStats,
}

impl Inner {
    /// Returns the live value for `key`, dropping it if expired.
    fn lookup(&mut self, key: &CompositeKey, now: Instant) -> Option<Vec<u8>> {
        let expired = self.entries.get(key)?.is_expired_at(now);
        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }
}

// == Memory Store ==
/// In-process stand-in for a memcached node.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: MemoryStoreStats::default(),
            }),
            max_entries,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        let expired: Vec<CompositeKey> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.entries.remove(key);
            inner.lru.remove(key);
        }

        expired.len()
    }

    /// Current number of entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns current store statistics.
    pub async fn stats(&self) -> MemoryStoreStats {
        let inner = self.inner.lock().await;
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        stats
    }

    /// Overwrites the raw bytes under `key`, bypassing any client framing.
    pub async fn insert_raw(&self, key: &CompositeKey, value: Vec<u8>) {
        let mut inner = self.inner.lock().await;
        inner
            .entries
            .insert(key.clone(), StoredEntry::new(value, Duration::ZERO));
        inner.lru.touch(key);
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn set(
        &self,
        key: &CompositeKey,
        value: Vec<u8>,
        expiry: Duration,
    ) -> Result<(), StoreError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::Rejected(format!(
                "value of {} bytes exceeds maximum of {} bytes",
                value.len(),
                MAX_VALUE_SIZE
            )));
        }

        let mut inner = self.inner.lock().await;
        inner.stats.sets += 1;

        let is_overwrite = inner.entries.contains_key(key);
        if !is_overwrite && inner.entries.len() >= self.max_entries {
            match inner.lru.evict_oldest() {
                Some(evicted) => {
                    inner.entries.remove(&evicted);
                    inner.stats.evictions += 1;
                    debug!(key = %evicted, "evicted least recently used entry");
                }
                None => {
                    return Err(StoreError::Rejected(
                        "store is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        inner.entries.insert(key.clone(), StoredEntry::new(value, expiry));
        inner.lru.touch(key);
        Ok(())
    }

    async fn get(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.stats.gets += 1;

        let value = inner.lookup(key, Instant::now());
        if value.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        Ok(value)
    }

    async fn get_bulk(
        &self,
        keys: &[CompositeKey],
    ) -> Result<HashMap<CompositeKey, Vec<u8>>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.stats.bulk_gets += 1;

        let now = Instant::now();
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            match inner.lookup(key, now) {
                Some(value) => {
                    inner.stats.hits += 1;
                    found.insert(key.clone(), value);
                }
                None => inner.stats.misses += 1,
            }
        }

        Ok(found)
    }
}
