//! Snapshot payloads and the files they are stored as.
//!
//! The active snapshot is two files in the storage root: [`HTML_FILE`] holds
//! the captured DOM and [`META_FILE`] is a JSON sidecar ([`SnapshotMeta`]).

use std::fmt::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// File name of the captured HTML document.
pub const HTML_FILE: &str = "index.html";

/// File name of the metadata sidecar.
pub const META_FILE: &str = "meta.json";

/// A captured page as posted by the browser extension.
///
/// ```
/// use snapshot_md::Snapshot;
///
/// let snapshot: Snapshot = serde_json::from_str(
///     r#"{"html": "<title>Hi</title>", "url": "https://example.com/", "userAgent": "Firefox"}"#,
/// ).unwrap();
/// assert_eq!(snapshot.user_agent.as_deref(), Some("Firefox"));
/// assert!(snapshot.timestamp.is_none());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub html: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Snapshot {
    pub fn new(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            url: url.into(),
            title: None,
            timestamp: None,
            user_agent: None,
        }
    }

    /// Content fingerprint used to skip rewriting an unchanged snapshot.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.html, &self.url)
    }
}

/// Sidecar record written next to the HTML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub fingerprint: String,
}

impl SnapshotMeta {
    /// Build the sidecar for `snapshot`, stamping it now if it carries no
    /// timestamp of its own.
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            url: snapshot.url.clone(),
            title: snapshot.title.clone(),
            captured_at: snapshot.timestamp.unwrap_or_else(Utc::now),
            user_agent: snapshot.user_agent.clone(),
            fingerprint: snapshot.fingerprint(),
        }
    }
}

/// The active snapshot as seen by the conversion side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub html_path: PathBuf,
    /// Empty when the sidecar is missing or unusable.
    pub source_url: String,
    pub captured_at: Option<DateTime<Utc>>,
}

/// Lowercase hex SHA-256 of `html`, a NUL separator, then `url`.
pub fn fingerprint(html: &str, url: &str) -> String {
    fingerprint_bytes(html.as_bytes(), url)
}

/// [`fingerprint`] over raw HTML bytes, as read back from storage.
pub fn fingerprint_bytes(html: &[u8], url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html);
    hasher.update([0u8]);
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
