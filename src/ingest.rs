//! Persisting incoming snapshots as the active document.

use tokio::sync::Mutex;

use crate::error::{ConversionError, Result};
use crate::snapshot::{HTML_FILE, META_FILE, Snapshot, SnapshotMeta, fingerprint_bytes};
use crate::storage::Storage;

/// Result of [`SnapshotStore::save`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot replaced the active one.
    Stored,
    /// Same HTML and URL as the active snapshot; nothing was written.
    Unchanged,
}

/// Writes snapshots into a [`Storage`] backend, replacing the active one.
///
/// A snapshot whose fingerprint (over HTML and URL) equals the stored one is
/// skipped. Saves are serialized so the HTML and its sidecar are always
/// written as a pair.
///
/// # Example
///
/// ```rust,no_run
/// use snapshot_md::{FsStorage, Snapshot, SnapshotStore};
///
/// # async fn example() -> snapshot_md::Result<()> {
/// let store = SnapshotStore::new(FsStorage::new("/var/data/snapshot"));
/// store.save(&Snapshot::new("<title>Hi</title>", "https://example.com/")).await?;
/// # Ok(())
/// # }
/// ```
pub struct SnapshotStore<S: Storage> {
    storage: S,
    write_lock: Mutex<()>,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate and persist `snapshot` unless it matches the active one.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<SaveOutcome> {
        if snapshot.html.trim().is_empty() {
            return Err(ConversionError::InvalidSnapshot(
                "html must not be empty".to_string(),
            ));
        }

        let meta = SnapshotMeta::for_snapshot(snapshot);
        let meta_json = serde_json::to_vec_pretty(&meta)
            .map_err(|e| ConversionError::Internal(format!("failed to encode metadata: {e}")))?;

        let _guard = self.write_lock.lock().await;

        if self.stored_fingerprint().await.as_deref() == Some(meta.fingerprint.as_str()) {
            tracing::debug!("Snapshot of {} unchanged, skipping write", snapshot.url);
            return Ok(SaveOutcome::Unchanged);
        }

        self.storage.put(HTML_FILE, snapshot.html.as_bytes()).await?;
        self.storage.put(META_FILE, &meta_json).await?;

        tracing::info!(
            "Stored snapshot of {} ({} bytes)",
            snapshot.url,
            snapshot.html.len()
        );
        Ok(SaveOutcome::Stored)
    }

    /// Fingerprint of the active snapshot, if both of its files are present
    /// and the sidecar was written for the HTML that is actually on disk.
    async fn stored_fingerprint(&self) -> Option<String> {
        let html = match tokio::fs::read(self.storage.resolve_path(HTML_FILE)).await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("No active snapshot to compare against: {e}");
                return None;
            }
        };

        let raw = tokio::fs::read(self.storage.resolve_path(META_FILE)).await.ok()?;
        let meta = match serde_json::from_slice::<SnapshotMeta>(&raw) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("Ignoring unreadable snapshot metadata: {e}");
                return None;
            }
        };

        if fingerprint_bytes(&html, &meta.url) != meta.fingerprint {
            tracing::warn!("Snapshot metadata does not match the stored HTML, ignoring it");
            return None;
        }
        Some(meta.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsStorage;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> SnapshotStore<FsStorage> {
        SnapshotStore::new(FsStorage::new(tmp.path()))
    }

    #[tokio::test]
    async fn first_save_writes_both_files() {
        let tmp = TempDir::new().unwrap();
        let outcome = store(&tmp)
            .save(&Snapshot::new("<title>A</title>", "https://example.com/a"))
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Stored);

        let html = std::fs::read_to_string(tmp.path().join(HTML_FILE)).unwrap();
        assert_eq!(html, "<title>A</title>");

        let meta: SnapshotMeta =
            serde_json::from_slice(&std::fs::read(tmp.path().join(META_FILE)).unwrap()).unwrap();
        assert_eq!(meta.url, "https://example.com/a");
        assert_eq!(meta.fingerprint, crate::fingerprint("<title>A</title>", "https://example.com/a"));
    }

    #[tokio::test]
    async fn identical_resave_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let snapshot = Snapshot::new("<title>A</title>", "https://example.com/a");

        assert_eq!(store.save(&snapshot).await.unwrap(), SaveOutcome::Stored);
        assert_eq!(store.save(&snapshot).await.unwrap(), SaveOutcome::Unchanged);
    }

    #[tokio::test]
    async fn changed_url_or_html_is_stored() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store
            .save(&Snapshot::new("<title>A</title>", "https://example.com/a"))
            .await
            .unwrap();
        let outcome = store
            .save(&Snapshot::new("<title>A</title>", "https://example.com/b"))
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Stored);

        let outcome = store
            .save(&Snapshot::new("<title>B</title>", "https://example.com/b"))
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Stored);
        let html = std::fs::read_to_string(tmp.path().join(HTML_FILE)).unwrap();
        assert_eq!(html, "<title>B</title>");
    }

    #[tokio::test]
    async fn missing_html_forces_rewrite() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let snapshot = Snapshot::new("<title>A</title>", "");

        store.save(&snapshot).await.unwrap();
        std::fs::remove_file(tmp.path().join(HTML_FILE)).unwrap();

        assert_eq!(store.save(&snapshot).await.unwrap(), SaveOutcome::Stored);
        assert!(tmp.path().join(HTML_FILE).exists());
    }

    #[tokio::test]
    async fn corrupt_sidecar_forces_rewrite() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let snapshot = Snapshot::new("<title>A</title>", "https://example.com/a");

        store.save(&snapshot).await.unwrap();
        std::fs::write(tmp.path().join(META_FILE), "{not json").unwrap();

        assert_eq!(store.save(&snapshot).await.unwrap(), SaveOutcome::Stored);
    }

    #[tokio::test]
    async fn sidecar_of_other_html_forces_rewrite() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let snapshot = Snapshot::new("<title>Old Vacancy</title>", "https://hh.ru/vacancy/111");
        store.save(&snapshot).await.unwrap();

        // HTML replaced without its sidecar following.
        std::fs::write(tmp.path().join(HTML_FILE), "<title>Unrelated Blog Post</title>").unwrap();

        assert_eq!(store.save(&snapshot).await.unwrap(), SaveOutcome::Stored);
        let html = std::fs::read_to_string(tmp.path().join(HTML_FILE)).unwrap();
        assert_eq!(html, "<title>Old Vacancy</title>");
    }

    #[tokio::test]
    async fn blank_html_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let result = store(&tmp).save(&Snapshot::new("  \n", "https://example.com")).await;
        assert!(matches!(result, Err(ConversionError::InvalidSnapshot(_))));
        assert!(!tmp.path().join(HTML_FILE).exists());
    }
}
