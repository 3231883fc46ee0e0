//! Cache Store Module
//!
//! The cache engine: a key -> entry index behind a single reader/writer lock,
//! with lazy TTL expiry on read.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::{CacheEntry, ContentType, EntryInfo, EntrySnapshot, Payload};
use crate::error::{CacheError, Result};

// == Cache ==
/// In-memory key/value store with optional per-entry TTL.
///
/// Successful reads, `len` and `entries` take the lock in shared mode.
/// Writes, deletes and the removal of an expired entry found by a read take
/// it exclusively. Nothing sweeps expired entries in the background, so
/// `len` and `entries` may still count entries whose TTL has elapsed until
/// a read touches them.
#[derive(Debug, Default)]
pub struct Cache {
    index: RwLock<HashMap<String, CacheEntry>>,
}

impl Cache {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a copy of `data` under `key`, replacing any previous entry.
    ///
    /// `ttl <= 0` stores an entry that never expires.
    pub fn set(
        &self,
        key: impl Into<String>,
        data: &[u8],
        content_type: ContentType,
        ttl: TimeDelta,
    ) -> Result<()> {
        let entry = CacheEntry::new(Payload::new(content_type, data), ttl, Utc::now());
        self.index.write().insert(key.into(), entry);
        Ok(())
    }

    /// Stores `text` tagged as plain text.
    pub fn set_string(&self, key: impl Into<String>, text: &str, ttl: TimeDelta) -> Result<()> {
        self.set(key, text.as_bytes(), ContentType::Text, ttl)
    }

    /// Serializes `value` to JSON and stores it tagged as JSON.
    ///
    /// The store is untouched if serialization fails.
    pub fn set_json<T>(&self, key: impl Into<String>, value: &T, ttl: TimeDelta) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value)?;
        self.set(key, &data, ContentType::Json, ttl)
    }

    // == Get ==
    /// Returns a copy of the raw bytes for `key`, whatever their type.
    pub fn get_bytes(&self, key: &str) -> Result<Vec<u8>> {
        self.lookup(key, |entry| Ok(entry.payload.bytes().to_vec()))
    }

    /// Returns a copy of the bytes for `key` if stored as `expected`.
    pub fn get_typed(&self, key: &str, expected: &ContentType) -> Result<Vec<u8>> {
        self.lookup(key, |entry| Ok(entry.bytes_as(key, expected)?.to_vec()))
    }

    /// Returns a text entry as a `String`.
    pub fn get_string(&self, key: &str) -> Result<String> {
        let bytes = self.get_typed(key, &ContentType::Text)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Deserializes a JSON entry into `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.lookup(key, |entry| {
            let bytes = entry.bytes_as(key, &ContentType::Json)?;
            Ok(serde_json::from_slice(bytes)?)
        })
    }

    /// Returns bytes, content type and expiry from a single lookup.
    pub fn get_entry(&self, key: &str) -> Result<EntrySnapshot> {
        self.lookup(key, |entry| Ok(EntrySnapshot::from(entry)))
    }

    /// Like [`Cache::get_entry`], failing with `IncorrectType` on a tag mismatch.
    pub fn get_entry_typed(&self, key: &str, expected: &ContentType) -> Result<EntrySnapshot> {
        self.lookup(key, |entry| {
            entry.bytes_as(key, expected)?;
            Ok(EntrySnapshot::from(entry))
        })
    }

    /// Runs `read` on the live entry for `key` under the shared lock.
    ///
    /// An expired entry is never handed to `read`; it is reaped instead and
    /// the lookup fails with `NotFound`.
    fn lookup<T>(&self, key: &str, read: impl FnOnce(&CacheEntry) -> Result<T>) -> Result<T> {
        let now = Utc::now();

        let expired_at = {
            let index = self.index.read();
            let entry = index
                .get(key)
                .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

            match entry.expires_at {
                Some(expires_at) if now >= expires_at => expires_at,
                _ => return read(entry),
            }
        };

        self.reap(key, expired_at);
        Err(CacheError::NotFound(key.to_string()))
    }

    /// Removes `key` only if it still carries the expiry seen by the reader.
    ///
    /// A writer may have replaced the entry between dropping the shared lock
    /// and taking the exclusive one; that newer entry must survive.
    fn reap(&self, key: &str, seen_expiry: DateTime<Utc>) -> bool {
        let mut index = self.index.write();
        let unchanged = index
            .get(key)
            .is_some_and(|entry| entry.expires_at == Some(seen_expiry));

        if unchanged {
            index.remove(key);
            debug!(key, expired_at = %seen_expiry, "reaped expired entry");
        }
        unchanged
    }

    // == Delete ==
    /// Removes the entry for `key`, expired or not.
    ///
    /// Returns the removed entry (if any) and whether one existed.
    pub fn delete(&self, key: &str) -> (Option<CacheEntry>, bool) {
        let removed = self.index.write().remove(key);
        let existed = removed.is_some();
        (removed, existed)
    }

    // == Length ==
    /// Number of indexed entries, including expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    // == Entries ==
    /// Point-in-time listing of all indexed entries, without payloads.
    ///
    /// Order is unspecified. Expired entries not yet reaped are included.
    pub fn entries(&self) -> Vec<EntryInfo> {
        self.index
            .read()
            .iter()
            .map(|(key, entry)| entry.info(key))
            .collect()
    }
}

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cache(len={})", self.len())
    }
}
