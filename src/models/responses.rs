//! Response messages for the cache RPC service

use serde::{Deserialize, Serialize};

use super::base64_bytes;
use crate::cache::{EntryInfo, EntrySnapshot};

/// Response body of `CacheService/Set`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResponse {}

/// Response body of `CacheService/Get`
///
/// `expires_at_ms` is Unix milliseconds, 0 when the entry never expires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetResponse {
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
    pub content_type: String,
    pub expires_at_ms: i64,
}

impl From<EntrySnapshot> for GetResponse {
    fn from(snapshot: EntrySnapshot) -> Self {
        Self {
            expires_at_ms: snapshot.expires_at_ms().unwrap_or(0),
            content_type: snapshot.content_type.to_string(),
            value: snapshot.value,
        }
    }
}

/// Response body of `CacheService/Delete`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    /// Whether an entry existed before the delete
    pub deleted: bool,
}

/// One row of `CacheService/ListEntries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListedEntry {
    pub key: String,
    /// Payload size in bytes
    pub size: u64,
    pub content_type: String,
    pub expires_at_ms: i64,
}

impl From<EntryInfo> for ListedEntry {
    fn from(info: EntryInfo) -> Self {
        Self {
            expires_at_ms: info.expires_at_ms().unwrap_or(0),
            size: info.size as u64,
            content_type: info.content_type.to_string(),
            key: info.key,
        }
    }
}

/// Response body of `CacheService/ListEntries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListEntriesResponse {
    pub entries: Vec<ListedEntry>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Serving status, always "SERVING" while the daemon is up
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn serving() -> Self {
        Self {
            status: "SERVING".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
