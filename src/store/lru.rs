//! LRU Tracker Module
//!
//! Recency ordering for the in-memory store's capacity eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Tracker ==
/// Tracks access order with a monotonically increasing tick per touch.
///
/// `ticks` maps a key to its last tick; `order` maps ticks back to keys,
/// so the smallest tick is always the least recently used key.
#[derive(Debug)]
pub struct LruTracker<K> {
    ticks: HashMap<K, u64>,
    order: BTreeMap<u64, K>,
    next_tick: u64,
}

impl<K: Clone + Eq + Hash> LruTracker<K> {
    pub fn new() -> Self {
        Self {
            ticks: HashMap::new(),
            order: BTreeMap::new(),
            next_tick: 0,
        }
    }

    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &K) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(previous) = self.ticks.insert(key.clone(), tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, key.clone());
    }

    pub fn remove(&mut self, key: &K) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    /// Returns and forgets the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }
}

impl<K: Clone + Eq + Hash> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_in_touch_order() {
        let mut lru = LruTracker::new();
        lru.touch(&"a");
        lru.touch(&"b");
        lru.touch(&"c");

        assert_eq!(lru.evict_oldest(), Some("a"));
        assert_eq!(lru.evict_oldest(), Some("b"));
        assert_eq!(lru.evict_oldest(), Some("c"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_touch_refreshes_recency() {
        let mut lru = LruTracker::new();
        lru.touch(&"a");
        lru.touch(&"b");
        lru.touch(&"a");

        assert_eq!(lru.evict_oldest(), Some("b"));
        assert_eq!(lru.evict_oldest(), Some("a"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut lru = LruTracker::new();
        lru.touch(&"a");
        lru.touch(&"b");
        lru.remove(&"a");
        lru.remove(&"missing");

        assert_eq!(lru.evict_oldest(), Some("b"));
        assert_eq!(lru.evict_oldest(), None);
    }
}
