//! API Module
//!
//! HTTP handlers and routing for the cache RPC service.
//!
//! # Endpoints
//! - `POST /stache.v1.CacheService/Set` - Store a typed value with optional TTL
//! - `POST /stache.v1.CacheService/Get` - Retrieve a value and its metadata
//! - `POST /stache.v1.CacheService/Delete` - Delete a key
//! - `POST /stache.v1.CacheService/ListEntries` - List keys without payloads
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod logging;
pub mod routes;

pub use handlers::*;
pub use routes::{
    create_router, DELETE_PROCEDURE, GET_PROCEDURE, LIST_ENTRIES_PROCEDURE, SERVICE_NAME,
    SET_PROCEDURE,
};
