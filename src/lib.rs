//! Stache - An in-memory key/value cache daemon
//!
//! Typed payloads (text, JSON, any MIME type) with optional TTL and lazy
//! expiry, served over a JSON RPC interface, plus a client for the CLI.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{Cache, ContentType};
pub use client::CacheClient;
pub use config::Config;
pub use error::{CacheError, RpcError};
