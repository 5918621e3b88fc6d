//! Namespaced Cache - a memcached-style cache client with namespace invalidation
//!
//! Keys are scoped to namespaces, and a whole namespace is invalidated in
//! O(1) by advancing its generation counter instead of deleting entries.

pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{GenerationRegistry, NamedKey, NamespacedCache};
pub use codec::ValueCodec;
pub use config::{CacheConfig, Config};
pub use error::{CacheError, CodecError, StoreError};
pub use store::{MemoryStore, RemoteStore};
pub use tasks::spawn_cleanup_task;
