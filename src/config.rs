//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Origin allowed by the CORS policy
    pub cors_origin: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SWEEP_INTERVAL_SECS` - Sweep frequency in seconds (default: 1)
    /// - `CORS_ALLOW_ORIGIN` - Allowed browser origin (default: http://localhost:3000)
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL_SECS", defaults.sweep_interval),
            cors_origin: env::var("CORS_ALLOW_ORIGIN").unwrap_or(defaults.cors_origin),
        }
    }

    /// Rejects settings that cannot produce a working cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "CACHE_CAPACITY must be a positive integer".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "SWEEP_INTERVAL_SECS must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10,
            server_port: 8080,
            sweep_interval: 1,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
