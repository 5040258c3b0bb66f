//! Cache Engine Module
//!
//! Thread-safe front of the cache: one mutex around a [`CacheStore`] plus the
//! background sweep task that prunes expired entries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{
    CacheEntry, CacheStats, CacheStore, Clock, SystemClock, DEFAULT_SWEEP_INTERVAL,
};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == LRU Cache ==
/// Bounded LRU cache with per-entry TTL, safe to share between threads.
///
/// Every operation holds the single lock for its whole duration, so
/// operations never interleave. The sweep task is started on construction
/// and stopped by [`LruCache::shutdown`] or when the cache is dropped.
///
/// # Example
/// ```ignore
/// let cache: LruCache<String> = LruCache::new(2)?;
/// cache.set("a", "1".to_string(), 0);
/// cache.set("b", "2".to_string(), 60);
/// assert_eq!(cache.get("a"), Some("1".to_string()));
/// ```
pub struct LruCache<V, C = SystemClock> {
    store: Arc<Mutex<CacheStore<V, C>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> LruCache<V, SystemClock>
where
    V: Send + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, sweeping once per
    /// second.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `capacity` is zero or no Tokio
    /// runtime is available to run the sweep.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, DEFAULT_SWEEP_INTERVAL, SystemClock)
    }
}

impl<V, C> LruCache<V, C>
where
    V: Send + 'static,
    C: Clock,
{
    /// Creates a cache with an explicit sweep interval and time source.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `capacity` or `sweep_interval`
    /// is zero, or if called outside a Tokio runtime.
    pub fn with_clock(capacity: usize, sweep_interval: Duration, clock: C) -> Result<Self> {
        if sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }
        Handle::try_current().map_err(|e| {
            CacheError::InvalidConfig(format!("sweep task needs a Tokio runtime: {e}"))
        })?;

        let store = Arc::new(Mutex::new(CacheStore::new(capacity, clock)?));
        let sweeper = spawn_sweep_task(Arc::downgrade(&store), sweep_interval);
        info!(capacity, ?sweep_interval, "LRU cache created");

        Ok(Self {
            store,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }
}

impl<V, C: Clock> LruCache<V, C> {
    // == Get ==
    /// Returns a clone of the live value for `key`, marking it most recently
    /// used. Expired entries are removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    // == Set ==
    /// Stores `value` under `key`. A `ttl_secs` of zero never expires.
    ///
    /// May evict the least recently used entry when inserting a new key into
    /// a full cache.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_secs: u64) {
        self.lock().set(key.into(), value, ttl_secs);
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    // == Get All ==
    /// Snapshot of every live entry, most recently used first.
    pub fn get_all(&self) -> Vec<CacheEntry<V>>
    where
        V: Clone,
    {
        self.lock().entries()
    }

    /// Runs one sweep pass immediately and returns how many entries it removed.
    pub fn sweep(&self) -> usize {
        self.lock().sweep_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    // == Shutdown ==
    /// Stops the background sweep. Calling it again is a no-op.
    ///
    /// The cache keeps serving requests afterwards; expired entries are then
    /// only removed lazily on read or by [`LruCache::sweep`].
    pub fn shutdown(&self) {
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            info!("Sweep task stopped");
        }
    }

    /// Returns true while the background sweep is scheduled.
    pub fn sweep_active(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore<V, C>> {
        // operations never leave the store half-updated, so a poisoned lock
        // still guards consistent state
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V, C> Drop for LruCache<V, C> {
    fn drop(&mut self) {
        let handle = self
            .sweeper
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl<V, C: Clock> std::fmt::Debug for LruCache<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.lock();
        f.debug_struct("LruCache")
            .field("capacity", &store.capacity())
            .field("len", &store.len())
            .finish()
    }
}
