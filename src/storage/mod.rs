//! Storage backends holding the active snapshot.
//!
//! A backend exposes a root directory and writes named files beneath it. The
//! resolver only reads through plain paths, so every backend must ultimately
//! be visible on the local filesystem.
//!
//! The crate ships with [`FsStorage`]. Implement [`Storage`] to add your own,
//! e.g. one that mirrors writes elsewhere.

mod fs;

pub use fs::FsStorage;

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Trait for backends that hold the snapshot files.
///
/// # Implementing a custom backend
///
/// ```rust,no_run
/// use std::path::{Path, PathBuf};
/// use snapshot_md::{Result, Storage};
///
/// struct ReadOnly(PathBuf);
///
/// impl Storage for ReadOnly {
///     fn storage_path(&self) -> &Path {
///         &self.0
///     }
///
///     async fn put(&self, _name: &str, _content: &[u8]) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Storage: Send + Sync + 'static {
    /// Root directory of the active snapshot.
    fn storage_path(&self) -> &Path;

    /// Location of the file called `name` inside the root.
    fn resolve_path(&self, name: &str) -> PathBuf {
        self.storage_path().join(name)
    }

    /// Persist `content` under `name`, replacing any previous file.
    ///
    /// Readers must observe either the old or the new content, never a mix.
    fn put(&self, name: &str, content: &[u8]) -> impl Future<Output = Result<()>> + Send;
}
