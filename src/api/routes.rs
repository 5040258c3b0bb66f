//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    delete_handler, get_all_handler, get_handler, health_handler, set_handler, stats_handler,
    AppState,
};
use crate::error::{CacheError, Result};

/// How long browsers may cache a CORS preflight answer
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache/get/:key` - Retrieve a value by key
/// - `POST /cache/set` - Store a key-value pair
/// - `DELETE /cache/delete/:key` - Delete a key
/// - `GET /cache/getall` - List live entries, most recent first
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: see [`cors_layer`]
/// - Tracing: Logs all requests
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/cache/get/:key", get(get_handler))
        .route("/cache/set", post(set_handler))
        .route("/cache/delete/:key", delete(delete_handler))
        .route("/cache/getall", get(get_all_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS policy for a single browser origin.
///
/// Credentials are allowed, so the origin must be explicit rather than `*`.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| CacheError::InvalidConfig(format!("invalid CORS origin '{origin}': {e}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}
