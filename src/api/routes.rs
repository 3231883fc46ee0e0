//! API Routes
//!
//! Configures the Axum router with the cache service procedures.

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, list_entries_handler, root_handler,
    set_handler, AppState,
};
use super::logging::log_rpc;

/// Fully qualified name of the cache service.
pub const SERVICE_NAME: &str = "stache.v1.CacheService";

pub const SET_PROCEDURE: &str = "/stache.v1.CacheService/Set";
pub const GET_PROCEDURE: &str = "/stache.v1.CacheService/Get";
pub const DELETE_PROCEDURE: &str = "/stache.v1.CacheService/Delete";
pub const LIST_ENTRIES_PROCEDURE: &str = "/stache.v1.CacheService/ListEntries";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /stache.v1.CacheService/{Set,Get,Delete,ListEntries}` - RPC procedures
/// - `GET /health` - Health check endpoint
/// - `GET /` - Liveness probe, empty 200
///
/// # Middleware
/// - RPC logging: procedure and latency per call (RPC routes only)
/// - Timeout: requests running longer than `request_timeout` get 408
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let rpc = Router::new()
        .route(SET_PROCEDURE, post(set_handler))
        .route(GET_PROCEDURE, post(get_handler))
        .route(DELETE_PROCEDURE, post(delete_handler))
        .route(LIST_ENTRIES_PROCEDURE, post(list_entries_handler))
        .route_layer(middleware::from_fn(log_rpc));

    Router::new()
        .merge(rpc)
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
