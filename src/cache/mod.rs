//! Cache Module
//!
//! Namespaced keys, generation-based invalidation and the client that ties
//! them to a remote store.
//!
//! Invalidation is local to one process: clients in separate processes keep
//! separate registries and must coordinate invalidation out of band.

mod client;
mod generations;
mod key;
mod stats;


// Re-export public types
pub use client::NamespacedCache;
pub use generations::{GenerationRegistry, MAX_BASE};
pub use key::{CompositeKey, KeyComposer, NamedKey};
pub use stats::{CacheStats, CacheStatsSnapshot};
