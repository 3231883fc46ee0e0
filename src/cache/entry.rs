//! Cache Entry Module
//!
//! Defines stored payloads, their content-type tags, and per-entry expiry.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{CacheError, Result};

/// MIME name of [`ContentType::Text`].
pub const TEXT_MIME: &str = "text/plain";

/// MIME name of [`ContentType::Json`].
pub const JSON_MIME: &str = "application/json";

// == Content Type ==
/// Encoding tag carried by every cache entry.
///
/// `Other` keeps any MIME name the caller supplied verbatim, so the set of
/// tags is open without giving up exact matching on reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Json,
    Other(String),
}

impl ContentType {
    /// Parses a MIME name. An empty name means plain text.
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim() {
            "" | TEXT_MIME => Self::Text,
            JSON_MIME => Self::Json,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical form of this tag: `Other` names are trimmed, and an
    /// `Other` spelling of a known MIME name becomes `Text` or `Json`.
    pub fn normalize(&self) -> Self {
        match self {
            Self::Other(mime) => Self::from_mime(mime),
            known => known.clone(),
        }
    }

    /// Returns the MIME name of this tag.
    pub fn as_mime(&self) -> &str {
        match self {
            Self::Text => TEXT_MIME,
            Self::Json => JSON_MIME,
            Self::Other(mime) => mime,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

impl From<&str> for ContentType {
    fn from(mime: &str) -> Self {
        Self::from_mime(mime)
    }
}

// == Payload ==
/// Owned, type-tagged value bytes.
///
/// The bytes are always a private copy; nothing outside the entry can
/// alias them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(Box<[u8]>),
    Json(Box<[u8]>),
    Other { mime: String, data: Box<[u8]> },
}

impl Payload {
    /// Copies `data` into a new payload tagged with `content_type`.
    pub fn new(content_type: ContentType, data: &[u8]) -> Self {
        let data: Box<[u8]> = data.into();
        // `Other("text/plain")` built by hand still lands on the Text tag
        match content_type.normalize() {
            ContentType::Text => Self::Text(data),
            ContentType::Json => Self::Json(data),
            ContentType::Other(mime) => Self::Other { mime, data },
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Text(_) => ContentType::Text,
            Self::Json(_) => ContentType::Json,
            Self::Other { mime, .. } => ContentType::Other(mime.clone()),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Text(data) | Self::Json(data) | Self::Other { data, .. } => &**data,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Returns the bytes only if the payload is a Text payload.
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Self::Text(data) => Some(&**data),
            _ => None,
        }
    }

    /// Returns the bytes only if the payload is a JSON payload.
    pub fn as_json(&self) -> Option<&[u8]> {
        match self {
            Self::Json(data) => Some(&**data),
            _ => None,
        }
    }

    /// Returns the bytes only if the tag equals `expected`. No coercion.
    ///
    /// `expected` is compared in its normalized form, the same form the
    /// payload was stored under.
    pub fn as_type(&self, expected: &ContentType) -> Option<&[u8]> {
        match (self, &expected.normalize()) {
            (Self::Text(_), ContentType::Text) => self.as_text(),
            (Self::Json(_), ContentType::Json) => self.as_json(),
            (Self::Other { mime, data }, ContentType::Other(want)) if mime == want => Some(&**data),
            _ => None,
        }
    }
}

// == Cache Entry ==
/// A single stored value with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub payload: Payload,
    /// Absolute expiry, `None` = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry whose expiry is `now + ttl`.
    ///
    /// A `ttl` of zero or less means the entry never expires. An expiry
    /// beyond the representable timestamp range is also stored as "never".
    pub fn new(payload: Payload, ttl: TimeDelta, now: DateTime<Utc>) -> Self {
        let expires_at = if ttl > TimeDelta::zero() {
            now.checked_add_signed(ttl)
        } else {
            None
        };

        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiry timestamp.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the payload bytes if the tag matches, `IncorrectType` otherwise.
    pub fn bytes_as(&self, key: &str, expected: &ContentType) -> Result<&[u8]> {
        self.payload
            .as_type(expected)
            .ok_or_else(|| CacheError::IncorrectType {
                key: key.to_string(),
                expected: expected.normalize(),
                actual: self.payload.content_type(),
            })
    }

    pub fn info(&self, key: &str) -> EntryInfo {
        EntryInfo {
            key: key.to_string(),
            size: self.payload.len(),
            content_type: self.payload.content_type(),
            expires_at: self.expires_at,
        }
    }
}

// == Entry Info ==
/// Payload-free description of an indexed entry, used for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub key: String,
    pub size: usize,
    pub content_type: ContentType,
    pub expires_at: Option<DateTime<Utc>>,
}

impl EntryInfo {
    /// Expiry as Unix milliseconds, `None` when the entry never expires.
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.expires_at.map(|at| at.timestamp_millis())
    }
}

// == Entry Snapshot ==
/// An independent copy of a live entry: bytes plus metadata, read atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub value: Vec<u8>,
    pub content_type: ContentType,
    pub expires_at: Option<DateTime<Utc>>,
}

impl EntrySnapshot {
    pub fn expires_at_ms(&self) -> Option<i64> {
        self.expires_at.map(|at| at.timestamp_millis())
    }
}

impl From<&CacheEntry> for EntrySnapshot {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            value: entry.payload.bytes().to_vec(),
            content_type: entry.payload.content_type(),
            expires_at: entry.expires_at,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_mime() {
        assert_eq!(ContentType::from_mime("text/plain"), ContentType::Text);
        assert_eq!(ContentType::from_mime(""), ContentType::Text);
        assert_eq!(ContentType::from_mime("application/json"), ContentType::Json);
        assert_eq!(
            ContentType::from_mime("image/png"),
            ContentType::Other("image/png".to_string())
        );
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }

    #[test]
    fn test_payload_copies_input() {
        let mut data = b"hello".to_vec();
        let payload = Payload::new(ContentType::Text, &data);

        data[0] = b'j';

        assert_eq!(payload.bytes(), b"hello");
    }

    #[test]
    fn test_payload_normalizes_known_mime_in_other() {
        let payload = Payload::new(ContentType::Other("application/json".to_string()), b"{}");
        assert_eq!(payload.content_type(), ContentType::Json);
        assert!(payload.as_json().is_some());
    }

    #[test]
    fn test_payload_as_type_no_coercion() {
        let text = Payload::new(ContentType::Text, b"{}");
        assert!(text.as_type(&ContentType::Text).is_some());
        assert!(text.as_type(&ContentType::Json).is_none());

        let png = Payload::new(ContentType::from_mime("image/png"), &[0x89, 0x50]);
        assert_eq!(png.as_type(&ContentType::from_mime("image/png")), Some(&[0x89, 0x50][..]));
        assert!(png.as_type(&ContentType::from_mime("image/gif")).is_none());
        assert!(png.as_text().is_none());
    }

    #[test]
    fn test_payload_as_type_normalizes_expected() {
        let json = Payload::new(ContentType::Other("application/json".to_string()), b"{}");
        assert!(json.as_type(&ContentType::Other("application/json".to_string())).is_some());
        assert!(json.as_type(&ContentType::Json).is_some());

        let png = Payload::new(ContentType::Other(" image/png ".to_string()), &[1]);
        assert!(png.as_type(&ContentType::Other(" image/png ".to_string())).is_some());
        assert!(png.as_type(&ContentType::Other("image/png".to_string())).is_some());
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let now = Utc::now();
        let payload = Payload::new(ContentType::Text, b"v");

        assert!(CacheEntry::new(payload.clone(), TimeDelta::zero(), now).expires_at.is_none());
        assert!(CacheEntry::new(payload, TimeDelta::seconds(-5), now).expires_at.is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let now = Utc::now();
        let entry = CacheEntry::new(
            Payload::new(ContentType::Text, b"v"),
            TimeDelta::seconds(60),
            now,
        );

        assert_eq!(entry.expires_at, Some(now + TimeDelta::seconds(60)));
        assert!(!entry.is_expired_at(now));
    }

    #[test]
    fn test_entry_ttl_overflow_never_expires() {
        let entry = CacheEntry::new(
            Payload::new(ContentType::Text, b"v"),
            TimeDelta::days(365_000_000),
            Utc::now(),
        );
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let entry = CacheEntry {
            payload: Payload::new(ContentType::Text, b"v"),
            expires_at: Some(now),
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - TimeDelta::milliseconds(1)));
    }

    #[test]
    fn test_bytes_as_mismatch() {
        let entry = CacheEntry::new(
            Payload::new(ContentType::Json, b"[1]"),
            TimeDelta::zero(),
            Utc::now(),
        );

        assert_eq!(entry.bytes_as("k", &ContentType::Json).unwrap(), b"[1]");
        let err = entry.bytes_as("k", &ContentType::Text).unwrap_err();
        assert!(matches!(
            err,
            CacheError::IncorrectType { ref key, expected: ContentType::Text, actual: ContentType::Json } if key == "k"
        ));
    }

    #[test]
    fn test_entry_info() {
        let now = Utc::now();
        let entry = CacheEntry::new(
            Payload::new(ContentType::Text, b"abc"),
            TimeDelta::seconds(1),
            now,
        );

        let info = entry.info("key");
        assert_eq!(info.key, "key");
        assert_eq!(info.size, 3);
        assert_eq!(info.content_type, ContentType::Text);
        assert_eq!(
            info.expires_at_ms(),
            Some((now + TimeDelta::seconds(1)).timestamp_millis())
        );
    }
}
