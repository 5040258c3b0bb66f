//! LRU TTL Cache - A bounded in-process cache with TTL expiration
//!
//! Combines least-recently-used eviction with per-entry time-to-live, safe to
//! share between threads, plus a small HTTP front end.
//!
//! # Runtime
//! [`LruCache`] spawns its expiry sweep on the current Tokio runtime as soon
//! as it is built. Constructing one outside a runtime returns
//! [`CacheError::InvalidConfig`], even for a valid capacity. Synchronous
//! callers can enter a runtime first:
//!
//! ```ignore
//! let rt = tokio::runtime::Runtime::new()?;
//! let _guard = rt.enter();
//! let cache: LruCache<String> = LruCache::new(128)?;
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::LruCache;
pub use config::Config;
pub use error::{CacheError, Result};
