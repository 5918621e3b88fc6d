//! Namespace Generation Registry
//!
//! Process-local map from namespace to its current generation. Bumping a
//! generation is the whole invalidation mechanism: every composite key
//! derived from the namespace changes, so old entries become unreachable
//! and age out of the store on their own.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use tracing::debug;

/// Largest starting generation. Leaves 2^63 invalidations of headroom
/// before a namespace's counter could reach `u64::MAX`.
pub const MAX_BASE: u64 = u64::MAX >> 1;

// == Generation Registry ==
/// Per-namespace generation counters.
///
/// Backed by a sharded map, so namespaces in different shards never
/// contend. Each read or bump holds only its shard's lock, which makes
/// updates to a single namespace linearizable.
#[derive(Debug)]
pub struct GenerationRegistry {
    generations: DashMap<String, u64>,
    base: u64,
}

impl GenerationRegistry {
    /// Creates a registry seeded with the current time in microseconds.
    ///
    /// A restarted process starts every namespace above the generations an
    /// earlier process reached, unless that process invalidated a namespace
    /// more often than once per microsecond of the gap between the two
    /// starts. Deployments that restart faster than that should share
    /// generations out of band.
    pub fn new() -> Self {
        let base = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(MAX_BASE))
            .unwrap_or(0);
        Self::with_base(base)
    }

    /// Creates a registry whose namespaces start at `base`, capped at
    /// [`MAX_BASE`].
    pub fn with_base(base: u64) -> Self {
        Self {
            generations: DashMap::new(),
            base: base.min(MAX_BASE),
        }
    }

    /// Generation assigned to namespaces on first reference.
    pub fn base(&self) -> u64 {
        self.base
    }

    // == Current Generation ==
    /// Returns the namespace's generation, registering it on first access.
    pub fn current_generation(&self, namespace: &str) -> u64 {
        if let Some(generation) = self.generations.get(namespace) {
            return *generation;
        }
        *self
            .generations
            .entry(namespace.to_string())
            .or_insert(self.base)
    }

    // == Invalidate ==
    /// Advances the namespace's generation and returns the new value.
    ///
    /// Generations never move backwards; a counter at `u64::MAX` stays there.
    pub fn invalidate(&self, namespace: &str) -> u64 {
        let mut generation = self
            .generations
            .entry(namespace.to_string())
            .or_insert(self.base);
        *generation = generation.saturating_add(1);
        let current = *generation;
        drop(generation);

        debug!(namespace, generation = current, "namespace invalidated");
        current
    }

    /// Number of namespaces seen so far.
    pub fn namespaces(&self) -> usize {
        self.generations.len()
    }

    /// Copies the current generation of every known namespace.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.generations
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl Default for GenerationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
