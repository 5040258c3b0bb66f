//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /cache/get/:key` - Retrieve a value by key
//! - `POST /cache/set` - Store a key-value pair
//! - `DELETE /cache/delete/:key` - Delete a key
//! - `GET /cache/getall` - List live entries
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{cors_layer, create_router};
