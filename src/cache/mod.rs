//! Cache Module
//!
//! Bounded in-memory caching with LRU eviction and TTL expiration.

mod clock;
mod engine;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::LruCache;
pub use entry::{expiry_for, never_expires, CacheEntry};
pub use lru::{LruList, NodeId};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Interval between background sweep passes
pub const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);
