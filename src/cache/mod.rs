//! Cache Module
//!
//! Provides the in-memory cache engine: type-tagged payloads with lazy TTL
//! expiry behind a reader/writer lock.

mod entry;
mod store;


// Re-export public types
pub use entry::{
    CacheEntry, ContentType, EntryInfo, EntrySnapshot, Payload, JSON_MIME, TEXT_MIME,
};
pub use store::Cache;
