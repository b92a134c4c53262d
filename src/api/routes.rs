//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, country_handler, country_mappings_handler, delete_handler, get_handler,
    health_handler, keys_handler, reference_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `POST /cache/clear` - Drop every entry and reset counters
/// - `GET /cache/stats` - Cache statistics
/// - `GET /cache/keys` - Stored keys, expired-but-unswept included
/// - `PUT /cache/entries` - Store a JSON document
/// - `GET /cache/entries/:key` - Read an entry
/// - `DELETE /cache/entries/:key` - Remove an entry
/// - `GET /reference/:name` - A static reference document
/// - `GET /reference/countries/:id` - One country record
/// - `GET /country-mappings` - iso3 -> name mapping, cached
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/clear", post(clear_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/keys", get(keys_handler))
        .route("/cache/entries", put(set_handler))
        .route(
            "/cache/entries/:key",
            get(get_handler).delete(delete_handler),
        )
        .route("/reference/:name", get(reference_handler))
        .route("/reference/countries/:id", get(country_handler))
        .route("/country-mappings", get(country_mappings_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
