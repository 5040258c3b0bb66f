//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and the boundary
//! checks applied before the cache is touched.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the SET operation (POST /cache/set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value, `null` when omitted
/// - `ttl`: TTL in seconds, 0 or omitted for no expiration
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: Value,
    /// TTL in seconds; signed so negative input reaches validation
    #[serde(default, alias = "expiration")]
    pub ttl: i64,
}

impl SetRequest {
    /// Validates the request and returns the TTL as an unsigned number of
    /// seconds.
    pub fn validate(&self) -> Result<u64> {
        validate_key(&self.key)?;
        u64::try_from(self.ttl).map_err(|_| {
            CacheError::InvalidRequest(
                "TTL must be zero or a positive number of seconds".to_string(),
            )
        })
    }
}

/// Checks a key taken from a request path or body.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
