//! Request and Response messages for the cache RPC service
//!
//! Messages are JSON objects with camelCase fields. `bytes` fields travel
//! as standard base64 strings.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{DeleteRequest, GetRequest, ListEntriesRequest, SetRequest};
pub use responses::{
    DeleteResponse, GetResponse, HealthResponse, ListEntriesResponse, ListedEntry, SetResponse,
};

/// Serde adapter for `Vec<u8>` fields encoded as base64 strings.
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
