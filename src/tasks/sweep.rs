//! TTL Sweep Task
//!
//! Background task that periodically prunes expired cache entries.

use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Clock};

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// Each pass locks the store once and removes expired entries from the least
/// recently used end until it meets a live one. The task holds only a weak
/// reference, so it ends by itself once the store is dropped; the returned
/// handle lets the owner abort it earlier.
///
/// Must be called from within a Tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(1000, SystemClock)?));
/// let handle = spawn_sweep_task(Arc::downgrade(&store), Duration::from_secs(1));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<V, C>(
    store: Weak<Mutex<CacheStore<V, C>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Send + 'static,
    C: Clock,
{
    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(shared) = store.upgrade() else {
                debug!("Cache dropped, stopping TTL sweep task");
                break;
            };

            let removed = {
                let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
                guard.sweep_expired()
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries at the tail");
            }
        }
    })
}
