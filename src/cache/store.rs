//! Cache Store Module
//!
//! Single-threaded cache core combining a key index with the recency list,
//! capacity eviction and TTL expiration. [`LruCache`](super::LruCache) wraps
//! it in a mutex for shared use.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{expiry_for, CacheEntry, CacheStats, Clock, LruList, NodeId};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key-value store with LRU eviction and TTL support.
///
/// Every key in `index` points at exactly one node in `order` holding an
/// entry with that key, and every node is indexed.
#[derive(Debug)]
pub struct CacheStore<V, C> {
    /// Key to list handle
    index: HashMap<String, NodeId>,
    /// Recency order, head = most recent
    order: LruList<V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    clock: C,
}

impl<V, C: Clock> CacheStore<V, C> {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` when `capacity` is zero.
    pub fn new(capacity: usize, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "cache capacity must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            clock,
        })
    }

    // == Get ==
    /// Looks up a live value and marks it most recently used.
    ///
    /// An entry found expired is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let now = self.clock.now();
        if self.order.get(id).map_or(true, |entry| entry.is_expired_at(now)) {
            self.unindex(key, id);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "Lazily expired entry on read");
            return None;
        }

        self.stats.record_hit();
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    // == Set ==
    /// Stores a value with a TTL in seconds, zero meaning no expiration.
    ///
    /// Overwriting an existing key replaces its value and expiry and marks it
    /// most recently used. Inserting a new key into a full store first evicts
    /// exactly one entry, the least recently used, and returns it.
    pub fn set(&mut self, key: String, value: V, ttl_secs: u64) -> Option<CacheEntry<V>> {
        let now = self.clock.now();

        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
                entry.expires_at = expiry_for(ttl_secs, now);
            }
            self.order.move_to_front(id);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let id = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, ttl_secs, now));
        self.index.insert(key, id);
        self.stats.set_total_entries(self.index.len());

        evicted
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.get(key) {
            Some(&id) => {
                self.unindex(key, id);
                true
            }
            None => false,
        }
    }

    // == Entries ==
    /// Returns a snapshot of all live entries, most recently used first.
    ///
    /// Expired entries are skipped but left in place; recency and hit/miss
    /// counters are not affected.
    pub fn entries(&self) -> Vec<CacheEntry<V>>
    where
        V: Clone,
    {
        let now = self.clock.now();
        self.order
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .cloned()
            .collect()
    }

    // == Sweep Expired ==
    /// Prunes expired entries from the least recently used end.
    ///
    /// Stops at the first live entry, so expired entries sitting behind it
    /// survive until they drift to the tail or are read. Returns the number
    /// of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        while let Some(tail) = self.order.back() {
            let expired = self
                .order
                .get(tail)
                .map_or(false, |entry| entry.is_expired_at(now));
            if !expired {
                break;
            }
            if let Some(entry) = self.order.pop_back() {
                self.index.remove(&entry.key);
                removed += 1;
            }
        }

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.index.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// removed.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_oldest(&mut self) -> Option<CacheEntry<V>> {
        let evicted = self.order.pop_back()?;
        self.index.remove(&evicted.key);
        self.stats.record_eviction();
        debug!(key = %evicted.key, "Evicted least recently used entry");
        Some(evicted)
    }

    fn unindex(&mut self, key: &str, id: NodeId) {
        self.index.remove(key);
        self.order.remove(id);
        self.stats.set_total_entries(self.index.len());
    }

    /// Asserts that the key index and the recency list mirror each other.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.order.len(), "index/list size mismatch");
        assert!(self.order.len() <= self.capacity, "capacity exceeded");
        let mut seen = std::collections::HashSet::new();
        for entry in self.order.iter() {
            assert!(seen.insert(entry.key.clone()), "duplicate node {}", entry.key);
            let id = self.index.get(&entry.key).expect("node missing from index");
            assert_eq!(self.order.get(*id).map(|e| &e.key), Some(&entry.key));
        }
        assert_eq!(seen.len(), self.order.len(), "list walk does not cover all nodes");
    }
}
