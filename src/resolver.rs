//! Locating the active snapshot and its source URL.

use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{ConversionError, Result};
use crate::snapshot::{HTML_FILE, META_FILE, StoredDocument, fingerprint_bytes};
use crate::storage::Storage;

/// Resolves the single active snapshot held by a [`Storage`] backend.
///
/// Nothing is cached: every call observes the files currently on disk.
pub struct SourceResolver<S: Storage> {
    storage: S,
}

impl<S: Storage> SourceResolver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Find the active HTML document and read its sidecar.
    ///
    /// Fails with [`ConversionError::NotFound`] if the HTML is absent. A
    /// missing or malformed sidecar is not an error; the source URL is then
    /// empty. The same holds for a sidecar whose fingerprint does not match
    /// the HTML on disk, so a document is never paired with the URL of a
    /// different snapshot.
    pub async fn resolve(&self) -> Result<StoredDocument> {
        let html_path = self.storage.resolve_path(HTML_FILE);

        match tokio::fs::metadata(&html_path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(ConversionError::NotFound { path: html_path }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConversionError::NotFound { path: html_path });
            }
            Err(e) => {
                return Err(ConversionError::Internal(format!(
                    "failed to stat {}: {e}",
                    html_path.display()
                )));
            }
        }

        let (source_url, captured_at) = self.read_sidecar(&html_path).await;
        Ok(StoredDocument {
            html_path,
            source_url,
            captured_at,
        })
    }

    async fn read_sidecar(&self, html_path: &Path) -> (String, Option<DateTime<Utc>>) {
        let path = self.storage.resolve_path(META_FILE);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("No usable metadata at {}: {e}", path.display());
                return (String::new(), None);
            }
        };

        let value: Value = match serde_json::from_slice(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Malformed metadata at {}: {e}", path.display());
                return (String::new(), None);
            }
        };

        let url = value
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        // Sidecars without a fingerprint cannot be checked and are trusted.
        if let Some(expected) = value.get("fingerprint") {
            if !self.matches_html(html_path, expected, &url).await {
                tracing::warn!(
                    "Metadata at {} belongs to a different snapshot, ignoring it",
                    path.display()
                );
                return (String::new(), None);
            }
        }

        let captured_at = value
            .get("capturedAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        (url, captured_at)
    }

    async fn matches_html(&self, html_path: &Path, expected: &Value, url: &str) -> bool {
        let Some(expected) = expected.as_str() else {
            return false;
        };
        match tokio::fs::read(html_path).await {
            Ok(html) => fingerprint_bytes(&html, url) == expected,
            Err(e) => {
                tracing::debug!("Cannot verify metadata against {}: {e}", html_path.display());
                false
            }
        }
    }
}
