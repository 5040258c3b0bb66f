//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

// == Cache Entry ==
/// A single cached item.
///
/// Entries without a TTL carry the [`never_expires`] sentinel, so every
/// expiry check is a single timestamp comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry<V> {
    /// The owning key
    pub key: String,
    /// The stored value, opaque to the cache
    pub value: V,
    /// Instant from which the entry is logically absent
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl_secs` seconds after `now`.
    ///
    /// A TTL of zero means the entry never expires on its own.
    pub fn new(key: String, value: V, ttl_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            expires_at: expiry_for(ttl_secs, now),
        }
    }

    // == Is Expired ==
    /// Checks if the entry is expired at `now`.
    ///
    /// The expiration instant itself already counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// == Utility Functions ==
/// Far-future timestamp assigned to entries stored without a TTL.
///
/// `9999-12-31T23:59:59Z` is well outside any TTL a caller can request and
/// still renders as a plain RFC 3339 date.
pub fn never_expires() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map_or(DateTime::<Utc>::MAX_UTC, |naive| naive.and_utc())
}

/// Computes the absolute expiry for a TTL given in seconds.
///
/// Zero maps to [`never_expires`]; TTLs that would overflow the calendar or
/// land past the sentinel saturate to it.
pub fn expiry_for(ttl_secs: u64, now: DateTime<Utc>) -> DateTime<Utc> {
    let sentinel = never_expires();
    if ttl_secs == 0 {
        return sentinel;
    }

    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .map_or(sentinel, |expires| expires.min(sentinel))
}
