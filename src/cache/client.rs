//! Cache Client Module
//!
//! Public operations composed from the key composer, the generation
//! registry, the value codec and a remote store. Store and decode failures
//! never reach the caller: reads degrade to misses and writes report an
//! unacknowledged `false`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{
    key::validate_namespace, CacheStats, CacheStatsSnapshot, CompositeKey, GenerationRegistry,
    KeyComposer, NamedKey,
};
use crate::codec::ValueCodec;
use crate::config::CacheConfig;
use crate::error::{Result, StoreError};
use crate::store::RemoteStore;

// == Namespaced Cache ==
/// Cache client with O(1) namespace invalidation.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct NamespacedCache<S> {
    store: S,
    registry: Arc<GenerationRegistry>,
    composer: KeyComposer,
    codec: ValueCodec,
    default_expiry: Duration,
    operation_timeout: Duration,
    stats: CacheStats,
}

impl<S: RemoteStore> NamespacedCache<S> {
    // == Constructors ==
    /// Creates a client with its own, clock-seeded generation registry.
    pub fn new(store: S, config: CacheConfig) -> Result<Self> {
        Self::with_registry(store, config, Arc::new(GenerationRegistry::new()))
    }

    /// Creates a client over an existing registry, so several clients in
    /// one process can share invalidations.
    pub fn with_registry(
        store: S,
        config: CacheConfig,
        registry: Arc<GenerationRegistry>,
    ) -> Result<Self> {
        let composer = KeyComposer::new(config.prefix, config.max_key_length)?;

        Ok(Self {
            store,
            registry,
            composer,
            codec: ValueCodec::new(config.compression_threshold),
            default_expiry: config.default_expiry,
            operation_timeout: config.operation_timeout,
            stats: CacheStats::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Arc<GenerationRegistry> {
        &self.registry
    }

    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Composite key `key` maps to under its namespace's current generation.
    pub fn composite_key(&self, key: &NamedKey) -> CompositeKey {
        let generation = self.registry.current_generation(key.namespace());
        self.composer.compose(key.namespace(), generation, key.key())
    }

    // == Get ==
    /// Fetches one value. Misses, timeouts, store errors and undecodable
    /// values all come back as `None`.
    pub async fn get(&self, key: &NamedKey) -> Option<Vec<u8>> {
        let composite = self.composite_key(key);

        let raw = match self.bounded(self.store.get(&composite)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.record_misses(1);
                return None;
            }
            Err(e) => {
                warn!(namespace = key.namespace(), key = %composite, error = %e, "cache get failed, treating as miss");
                self.stats.record_store_failure();
                self.stats.record_misses(1);
                return None;
            }
        };

        match self.codec.decode(&raw) {
            Ok(value) => {
                self.stats.record_hits(1);
                Some(value)
            }
            Err(e) => {
                warn!(key = %composite, error = %e, "undecodable cache value, treating as miss");
                self.stats.record_decode_failure();
                self.stats.record_misses(1);
                None
            }
        }
    }

    // == Get Bulk ==
    /// Fetches many keys, possibly across namespaces, in one store round trip.
    ///
    /// Each namespace's generation is read once for the whole batch. The
    /// result holds only hits; absent or undecodable keys are left out.
    pub async fn get_bulk<'a, I>(&self, keys: I) -> HashMap<NamedKey, Vec<u8>>
    where
        I: IntoIterator<Item = &'a NamedKey>,
    {
        let mut generations: HashMap<&'a str, u64> = HashMap::new();
        let mut pending: HashMap<CompositeKey, &'a NamedKey> = HashMap::new();

        for key in keys {
            let generation = *generations
                .entry(key.namespace())
                .or_insert_with(|| self.registry.current_generation(key.namespace()));
            let composite = self.composer.compose(key.namespace(), generation, key.key());
            pending.insert(composite, key);
        }

        if pending.is_empty() {
            return HashMap::new();
        }

        let composites: Vec<CompositeKey> = pending.keys().cloned().collect();
        let found = match self.bounded(self.store.get_bulk(&composites)).await {
            Ok(found) => found,
            Err(e) => {
                warn!(keys = pending.len(), error = %e, "cache bulk get failed, treating as misses");
                self.stats.record_store_failure();
                self.stats.record_misses(pending.len() as u64);
                return HashMap::new();
            }
        };

        let mut results = HashMap::with_capacity(found.len());
        for (composite, raw) in found {
            let Some(named) = pending.get(&composite) else {
                continue;
            };
            match self.codec.decode(&raw) {
                Ok(value) => {
                    results.insert((*named).clone(), value);
                }
                Err(e) => {
                    warn!(key = %composite, error = %e, "undecodable cache value in bulk get, skipping");
                    self.stats.record_decode_failure();
                }
            }
        }

        let hits = results.len() as u64;
        self.stats.record_hits(hits);
        self.stats.record_misses(pending.len() as u64 - hits);
        debug!(requested = pending.len(), hits, "cache bulk get");

        results
    }

    // == Put ==
    /// Stores `value` with the default expiry. Returns whether the store
    /// acknowledged the write; failures are logged, never raised.
    pub async fn put(&self, key: &NamedKey, value: &[u8]) -> bool {
        self.put_with_expiry(key, value, self.default_expiry).await
    }

    /// Stores `value` with an explicit expiry.
    pub async fn put_with_expiry(&self, key: &NamedKey, value: &[u8], expiry: Duration) -> bool {
        let composite = self.composite_key(key);
        let encoded = self.codec.encode(value);

        match self
            .bounded(self.store.set(&composite, encoded, expiry))
            .await
        {
            Ok(()) => {
                self.stats.record_put();
                debug!(key = %composite, bytes = value.len(), "cache put");
                true
            }
            Err(e) => {
                warn!(namespace = key.namespace(), key = %composite, error = %e, "cache put failed");
                self.stats.record_put_failure();
                false
            }
        }
    }

    // == Invalidate ==
    /// Makes every entry of `namespace` unreachable by advancing its
    /// generation. No store call is made; old entries expire on their own.
    ///
    /// Returns the new generation.
    pub fn invalidate(&self, namespace: &str) -> Result<u64> {
        validate_namespace(namespace)?;
        let generation = self.registry.invalidate(namespace);
        self.stats.record_invalidation();
        Ok(generation)
    }

    /// Current generation of `namespace`, registering it if unseen.
    pub fn generation(&self, namespace: &str) -> Result<u64> {
        validate_namespace(namespace)?;
        Ok(self.registry.current_generation(namespace))
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Applies the operation timeout to a store call and counts timeouts,
    /// whether the deadline fired here or the store reported one.
    async fn bounded<T, F>(&self, call: F) -> std::result::Result<T, StoreError>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        let result = match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(
                self.operation_timeout.as_millis() as u64,
            )),
        };
        if let Err(StoreError::Timeout(_)) = result {
            self.stats.record_timeout();
        }
        result
    }
}
