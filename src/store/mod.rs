//! Remote Store Module
//!
//! The narrow contract the cache client needs from a memcached-style
//! store, plus an in-memory implementation.

mod entry;
mod lru;
mod memory;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::CompositeKey;
use crate::error::StoreError;

pub use entry::StoredEntry;
pub use lru::LruTracker;
pub use memory::{MemoryStore, MemoryStoreStats};

// == Public Constants ==
/// Largest value the in-memory store accepts, matching memcached's default item size
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Remote Store ==
/// Operations the cache client issues against the external store.
///
/// Implementations own transport, node placement and failover; the client
/// only sees success, absence, or a [`StoreError`].
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Stores `value` under `key`. A zero `expiry` means the entry never expires.
    async fn set(
        &self,
        key: &CompositeKey,
        value: Vec<u8>,
        expiry: Duration,
    ) -> Result<(), StoreError>;

    /// Fetches a single value.
    async fn get(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Fetches many values in one round trip. Missing keys are left out.
    async fn get_bulk(
        &self,
        keys: &[CompositeKey],
    ) -> Result<HashMap<CompositeKey, Vec<u8>>, StoreError>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn set(
        &self,
        key: &CompositeKey,
        value: Vec<u8>,
        expiry: Duration,
    ) -> Result<(), StoreError> {
        (**self).set(key, value, expiry).await
    }

    async fn get(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn get_bulk(
        &self,
        keys: &[CompositeKey],
    ) -> Result<HashMap<CompositeKey, Vec<u8>>, StoreError> {
        (**self).get_bulk(keys).await
    }
}
