//! Filesystem storage backend.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{ConversionError, Result};
use crate::storage::Storage;

/// Storage backend rooted at a local directory.
///
/// The root is created on first write. Each file is written to a temporary
/// file in the same directory and then renamed over the target.
///
/// # Example
///
/// ```rust,no_run
/// use snapshot_md::{FsStorage, Storage};
///
/// let storage = FsStorage::new("/var/data/snapshot");
/// assert!(storage.resolve_path("index.html").ends_with("index.html"));
/// ```
#[derive(Clone, Debug)]
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    /// Create a new `FsStorage` rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Storage for FsStorage {
    fn storage_path(&self) -> &Path {
        &self.base_dir
    }

    async fn put(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.resolve_path(name);
        let len = content.len();
        let content = content.to_vec();

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &content))
            .await
            .map_err(|e| ConversionError::StorageWrite(Box::new(e)))?
            .map_err(|e| ConversionError::StorageWrite(Box::new(e)))?;

        tracing::debug!("Wrote {len} bytes to {}", path.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
