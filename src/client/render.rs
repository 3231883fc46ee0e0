//! CLI Rendering
//!
//! Turns RPC responses into the text the `stache` CLI prints.

use chrono::{DateTime, SecondsFormat};
use tabled::{settings::Style, Table, Tabled};

use crate::cache::ContentType;
use crate::models::ListedEntry;

/// Renders a fetched value for display.
///
/// Text is printed as-is, JSON is pretty-printed when it parses (raw text
/// otherwise), and any other type is summarized as a byte count.
pub fn render_value(content_type: &str, value: &[u8]) -> String {
    match ContentType::from_mime(content_type) {
        ContentType::Text => String::from_utf8_lossy(value).into_owned(),
        ContentType::Json => serde_json::from_slice::<serde_json::Value>(value)
            .ok()
            .and_then(|parsed| serde_json::to_string_pretty(&parsed).ok())
            .unwrap_or_else(|| String::from_utf8_lossy(value).into_owned()),
        ContentType::Other(mime) => format!("({} bytes, {})", value.len(), mime),
    }
}

/// Confirmation line printed after a successful set.
pub fn render_set_ack(key: &str, content_type: &str, ttl_seconds: i64) -> String {
    format!("OK set key={key:?} ct={content_type:?} ttl={ttl_seconds}s")
}

/// Formats an epoch-milliseconds expiry as RFC 3339, `-` when there is none.
pub fn format_expiry(expires_at_ms: i64) -> String {
    if expires_at_ms <= 0 {
        return "-".to_string();
    }
    DateTime::from_timestamp_millis(expires_at_ms)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| expires_at_ms.to_string())
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "SIZE")]
    size: u64,
    #[tabled(rename = "CONTENT-TYPE")]
    content_type: String,
    #[tabled(rename = "EXPIRES")]
    expires: String,
}

/// Renders a listing as an aligned, borderless table with a header row.
pub fn render_entries(entries: &[ListedEntry]) -> String {
    let rows = entries.iter().map(|entry| EntryRow {
        key: entry.key.clone(),
        size: entry.size,
        content_type: entry.content_type.clone(),
        expires: format_expiry(entry.expires_at_ms),
    });

    Table::new(rows).with(Style::blank()).to_string()
}
