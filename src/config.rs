//! Builder for configuring a [`ConversionService`].

use crate::registry::PluginRegistry;
use crate::service::ConversionService;
use crate::storage::Storage;

/// Builder for a [`ConversionService`].
///
/// Defaults to [`PluginRegistry::builtin`].
///
/// # Example
///
/// ```rust,no_run
/// use snapshot_md::{FsStorage, PluginRegistry, ServiceBuilder, SitePlugin, TitlePlugin};
///
/// # async fn example() {
/// let registry = PluginRegistry::builder()
///     .custom(SitePlugin::hh_vacancy())
///     .standard(TitlePlugin::new())
///     .build();
///
/// let service = ServiceBuilder::new(FsStorage::new("/var/data/snapshot"))
///     .registry(registry)
///     .build();
///
/// match service.convert().await {
///     Ok(markdown) => println!("{markdown}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// # }
/// ```
pub struct ServiceBuilder<S: Storage> {
    storage: S,
    registry: PluginRegistry,
}

impl<S: Storage> ServiceBuilder<S> {
    /// Create a builder over `storage` with the built-in plugins.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            registry: PluginRegistry::builtin(),
        }
    }

    /// Replace the plugin registry.
    pub fn registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> ConversionService<S> {
        ConversionService::new(self.storage, self.registry)
    }
}
