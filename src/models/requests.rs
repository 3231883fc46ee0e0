//! Request messages for the cache RPC service
//!
//! Every message deserializes leniently: missing fields take their zero
//! value, so an absent key is reported as an empty key.

use serde::{Deserialize, Serialize};

use super::base64_bytes;

/// Rejects the empty key; the engine itself accepts any string.
fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("key required".to_string());
    }
    None
}

/// Request body of `CacheService/Set`
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The payload bytes
/// - `content_type`: MIME type tag, `text/plain` when absent or empty
/// - `ttl`: TTL in seconds, zero or negative for no expiry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetRequest {
    pub key: String,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body of `CacheService/Get`
///
/// When `content_type` is set the read is typed and fails on a tag mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetRequest {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl GetRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body of `CacheService/Delete`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteRequest {
    pub key: String,
}

impl DeleteRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body of `CacheService/ListEntries`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntriesRequest {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": "aGVsbG8=", "contentType": "application/json", "ttl": 60}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, b"hello");
        assert_eq!(req.content_type.as_deref(), Some("application/json"));
        assert_eq!(req.ttl, Some(60));
    }

    #[test]
    fn test_set_request_defaults() {
        let req: SetRequest = serde_json::from_str(r#"{"key": "test"}"#).unwrap();
        assert!(req.value.is_empty());
        assert!(req.content_type.is_none());
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_bad_base64() {
        let result = serde_json::from_str::<SetRequest>(r#"{"key": "k", "value": "@@@"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_request_serialize_skips_absent() {
        let req = SetRequest {
            key: "k".to_string(),
            value: b"hi".to_vec(),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"key":"k","value":"aGk="}"#);
    }

    #[test]
    fn test_validate_empty_key() {
        assert!(SetRequest::default().validate().is_some());
        assert!(GetRequest::default().validate().is_some());
        assert!(DeleteRequest::default().validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: b"test".to_vec(),
            content_type: None,
            ttl: Some(60),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_missing_key_is_empty() {
        let req: GetRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.key, "");
        assert!(req.validate().is_some());
    }
}
