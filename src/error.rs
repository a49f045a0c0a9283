//! Error types for the `snapshot_md` crate.
//!
//! [`ConversionError`] is what crosses the service and ingestion boundaries.
//! [`PluginFault`] is local to a single plugin call: the pipeline logs it and
//! treats the plugin as having declined, so it never reaches a caller.

use std::path::PathBuf;

/// All errors that can surface from conversion or snapshot ingestion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The active snapshot's HTML document does not exist.
    #[error("No stored snapshot at {}", path.display())]
    NotFound { path: PathBuf },

    /// The registry holds zero plugins.
    #[error("No conversion plugin is registered")]
    NoPluginAvailable,

    /// Every registered plugin declined or faulted.
    #[error("All {tried} conversion plugins declined")]
    AllPluginsDeclined { tried: usize },

    /// An ingestion payload failed validation.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A storage backend failed to persist content.
    #[error("Storage write failed: {0}")]
    StorageWrite(Box<dyn std::error::Error + Send + Sync>),

    /// The builder or process-wide state is misconfigured.
    #[error("Config error: {0}")]
    Config(String),

    /// Unexpected infrastructure fault outside any plugin.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConversionError {
    /// `true` for the two kinds that mean "plugins exist or not, but nothing
    /// produced Markdown".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ConversionError::NoPluginAvailable | ConversionError::AllPluginsDeclined { .. }
        )
    }
}

/// A type alias for `Result<T, ConversionError>`.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Unexpected failure raised by a plugin, either while being constructed or
/// during an `attempt`.
#[derive(Debug, thiserror::Error)]
pub enum PluginFault {
    /// The HTML document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plugin could not be instantiated.
    #[error("failed to initialise plugin: {0}")]
    Init(String),

    /// Any other plugin-specific failure.
    #[error("{0}")]
    Other(String),
}

impl From<regex::Error> for PluginFault {
    fn from(e: regex::Error) -> Self {
        PluginFault::Init(e.to_string())
    }
}
