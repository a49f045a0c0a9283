//! Facade tying the resolver and the pipeline together.

use std::sync::Arc;

use crate::error::{ConversionError, Result};
use crate::pipeline::ConversionPipeline;
use crate::registry::PluginRegistry;
use crate::resolver::SourceResolver;
use crate::storage::{FsStorage, Storage};

/// Converts the active snapshot to Markdown.
///
/// Built by [`ServiceBuilder`](crate::ServiceBuilder). Safe to share between
/// requests: the only shared state is the immutable plugin list.
pub struct ConversionService<S: Storage = FsStorage> {
    resolver: SourceResolver<S>,
    pipeline: Arc<ConversionPipeline>,
}

impl<S: Storage> ConversionService<S> {
    pub(crate) fn new(storage: S, registry: PluginRegistry) -> Self {
        Self {
            resolver: SourceResolver::new(storage),
            pipeline: Arc::new(ConversionPipeline::new(registry)),
        }
    }

    /// Resolve the active snapshot and run the plugin chain over it.
    ///
    /// Plugins read files synchronously, so the chain runs on tokio's
    /// blocking pool.
    pub async fn convert(&self) -> Result<String> {
        let document = self.resolver.resolve().await?;
        tracing::debug!(
            "Converting {} (url: {:?})",
            document.html_path.display(),
            document.source_url
        );

        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || {
            pipeline.run(&document.html_path, &document.source_url)
        })
        .await
        .map_err(|e| ConversionError::Internal(format!("conversion task failed: {e}")))?
    }

    pub fn registry(&self) -> &PluginRegistry {
        self.pipeline.registry()
    }

    pub fn storage(&self) -> &S {
        self.resolver.storage()
    }
}
