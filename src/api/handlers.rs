//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers validate
//! input and translate cache results; all cache behavior lives in
//! [`LruCache`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{LruCache, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    validate_key, DeleteResponse, EntryResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache does its own locking, so handlers share it through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache of JSON values
    pub cache: Arc<LruCache<Value>>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: LruCache<Value>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Must be called from within a Tokio runtime, since the cache starts its
    /// sweep task immediately.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let cache = LruCache::with_clock(config.capacity, config.sweep_interval(), SystemClock)?;
        Ok(Self::new(cache))
    }
}

/// Handler for POST /cache/set
///
/// Stores a key-value pair in the cache with an optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let ttl = req.validate()?;

    state.cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/get/:key
///
/// Looks a key up; a missing or expired key is reported with `found: false`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    validate_key(&key)?;

    let value = state.cache.get(&key);

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/delete/:key
///
/// Deletes a key; deleting an absent key still succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    validate_key(&key)?;

    let removed = state.cache.delete(&key);

    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for GET /cache/getall
///
/// Lists every live entry, most recently used first.
pub async fn get_all_handler(State(state): State<AppState>) -> Json<Vec<EntryResponse>> {
    let entries = state
        .cache
        .get_all()
        .into_iter()
        .map(EntryResponse::from)
        .collect();

    Json(entries)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde_json::json;

    fn test_state(capacity: usize) -> AppState {
        AppState::new(LruCache::new(capacity).unwrap())
    }

    fn set_request(key: &str, value: Value, ttl: i64) -> Json<SetRequest> {
        Json(SetRequest {
            key: key.to_string(),
            value,
            ttl,
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state(100);

        let result = set_handler(
            State(state.clone()),
            set_request("test_key", json!({"n": 1}), 0),
        )
        .await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert!(response.found);
        assert_eq!(response.value, Some(json!({"n": 1})));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state(100);

        let response = get_handler(State(state), Path("nonexistent".to_string()))
            .await
            .unwrap();
        assert!(!response.found);
        assert!(response.value.is_none());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state(100);

        set_handler(State(state.clone()), set_request("to_delete", json!("v"), 0))
            .await
            .unwrap();

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(response.removed);

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(!response.removed);

        let response = get_handler(State(state), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert!(!response.found);
    }

    #[tokio::test]
    async fn test_get_all_handler_most_recent_first() {
        let state = test_state(100);

        for key in ["a", "b", "c"] {
            set_handler(State(state.clone()), set_request(key, json!(key), 0))
                .await
                .unwrap();
        }
        get_handler(State(state.clone()), Path("a".to_string()))
            .await
            .unwrap();

        let Json(entries) = get_all_handler(State(state)).await;
        let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state(5);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 5);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state(100);

        let result = set_handler(State(state.clone()), set_request("", json!("v"), 0)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result = set_handler(State(state.clone()), set_request("k", json!("v"), -1)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_rejects_zero_capacity() {
        let config = Config {
            capacity: 0,
            ..Config::default()
        };
        assert!(matches!(
            AppState::from_config(&config),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
