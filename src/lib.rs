//! # snapshot_md
//!
//! Stores a browser-captured page snapshot and converts it to Markdown through
//! an ordered chain of conversion plugins.
//!
//! ## Overview
//!
//! A browser extension posts the page's DOM to [`http::post_snapshot`], which
//! writes it through a [`SnapshotStore`] into a [`Storage`] backend as the
//! single *active* snapshot. [`http::get_markdown`] asks the
//! [`ConversionService`] to resolve that snapshot and run it through the
//! [`ConversionPipeline`]: each [`ConversionPlugin`] in
//! [`PluginRegistry`] order may answer with Markdown or decline, and the first
//! non-blank answer wins. A plugin that fails or panics is logged and skipped.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use snapshot_md::{FsStorage, ServiceBuilder, Snapshot, SnapshotStore};
//!
//! # async fn example() -> snapshot_md::Result<()> {
//! let store = SnapshotStore::new(FsStorage::new("/tmp/snapshot"));
//! store
//!     .save(&Snapshot::new("<title>Backend Engineer</title>", "https://hh.ru/vacancy/12345"))
//!     .await?;
//!
//! let service = ServiceBuilder::new(FsStorage::new("/tmp/snapshot")).build();
//! let markdown = service.convert().await?;
//! assert!(markdown.starts_with("# Backend Engineer"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod ingest;
pub mod pipeline;
pub mod plugin;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod storage;

pub use config::ServiceBuilder;
pub use error::{ConversionError, PluginFault, Result};
pub use ingest::{SaveOutcome, SnapshotStore};
pub use pipeline::ConversionPipeline;
pub use plugin::{Attempt, ConversionPlugin, SitePlugin, TitlePlugin};
pub use registry::{PluginGroup, PluginRegistry, PluginRegistryBuilder};
pub use resolver::SourceResolver;
pub use service::ConversionService;
pub use snapshot::{
    HTML_FILE, META_FILE, Snapshot, SnapshotMeta, StoredDocument, fingerprint, fingerprint_bytes,
};
pub use storage::{FsStorage, Storage};

use std::sync::OnceLock;

// Process-wide service for applications that prefer a global over passing
// the service around.
static GLOBAL: OnceLock<ConversionService> = OnceLock::new();

/// Install the process-wide [`ConversionService`].
///
/// Call once at startup. Fails with [`ConversionError::Config`] if a service
/// is already installed; the existing one is left untouched.
pub fn init(builder: ServiceBuilder<FsStorage>) -> Result<&'static ConversionService> {
    let mut installed = false;
    let service = GLOBAL.get_or_init(|| {
        installed = true;
        builder.build()
    });

    if !installed {
        return Err(ConversionError::Config(
            "conversion service already initialized".to_string(),
        ));
    }
    Ok(service)
}

/// The service installed by [`init()`], if any.
pub fn global() -> Option<&'static ConversionService> {
    GLOBAL.get()
}
