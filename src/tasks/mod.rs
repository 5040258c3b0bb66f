//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - TTL Sweep: prunes expired entries from the least recently used end

mod sweep;

pub use sweep::spawn_sweep_task;
