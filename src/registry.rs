//! Ordered, build-once collection of conversion plugins.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::PluginFault;
use crate::plugin::{ConversionPlugin, SitePlugin, TitlePlugin};

/// Registration group. Custom plugins always run before standard ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluginGroup {
    Custom,
    Standard,
}

/// The ordered plugin list consulted by the pipeline.
///
/// Built once by [`PluginRegistryBuilder`] and never mutated afterwards.
/// Cloning is cheap and shares the same list.
#[derive(Clone)]
pub struct PluginRegistry {
    plugins: Arc<[Arc<dyn ConversionPlugin>]>,
}

impl PluginRegistry {
    /// Start building a registry.
    pub fn builder() -> PluginRegistryBuilder {
        PluginRegistryBuilder::new()
    }

    /// A registry with no plugins.
    pub fn empty() -> Self {
        Self {
            plugins: Arc::from(Vec::new()),
        }
    }

    /// The plugins shipped with this crate: `hh-vacancy` (custom) followed
    /// by `title` (standard).
    pub fn builtin() -> Self {
        PluginRegistryBuilder::new()
            .custom(SitePlugin::hh_vacancy())
            .standard(TitlePlugin::new())
            .build()
    }

    /// Plugins in execution order.
    pub fn plugins(&self) -> &[Arc<dyn ConversionPlugin>] {
        &self.plugins
    }

    /// Plugin names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Builder for a [`PluginRegistry`].
///
/// A factory that fails is logged and skipped; the remaining entries still
/// load. Names only order and label plugins, so two plugins may share one.
///
/// On [`build`](Self::build) each group is sorted by plugin name and the
/// custom group is placed before the standard group. Plugins with equal
/// names keep their registration order.
///
/// # Example
///
/// ```
/// use snapshot_md::{PluginRegistry, SitePlugin, TitlePlugin};
///
/// let registry = PluginRegistry::builder()
///     .standard(TitlePlugin::new())
///     .custom_with(|| SitePlugin::new("docs-rs", r"^https://docs\.rs/", "Open docs"))
///     .custom(SitePlugin::hh_vacancy())
///     .build();
///
/// assert_eq!(registry.names(), vec!["docs-rs", "hh-vacancy", "title"]);
/// ```
#[derive(Default)]
pub struct PluginRegistryBuilder {
    custom: Vec<Arc<dyn ConversionPlugin>>,
    standard: Vec<Arc<dyn ConversionPlugin>>,
    names: HashSet<String>,
}

impl PluginRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin in the custom group.
    pub fn custom(self, plugin: impl ConversionPlugin + 'static) -> Self {
        self.register(PluginGroup::Custom, Arc::new(plugin))
    }

    /// Register a plugin in the standard group.
    pub fn standard(self, plugin: impl ConversionPlugin + 'static) -> Self {
        self.register(PluginGroup::Standard, Arc::new(plugin))
    }

    /// Instantiate a custom-group plugin, skipping it if the factory fails.
    pub fn custom_with<P, F>(self, factory: F) -> Self
    where
        P: ConversionPlugin + 'static,
        F: FnOnce() -> Result<P, PluginFault>,
    {
        self.register_with(PluginGroup::Custom, factory)
    }

    /// Instantiate a standard-group plugin, skipping it if the factory fails.
    pub fn standard_with<P, F>(self, factory: F) -> Self
    where
        P: ConversionPlugin + 'static,
        F: FnOnce() -> Result<P, PluginFault>,
    {
        self.register_with(PluginGroup::Standard, factory)
    }

    /// Register an already shared plugin in `group`.
    pub fn register(mut self, group: PluginGroup, plugin: Arc<dyn ConversionPlugin>) -> Self {
        let name = plugin.name();
        if name.trim().is_empty() {
            tracing::debug!("Registering {group:?} plugin with a blank name");
        }
        if !self.names.insert(name.to_string()) {
            tracing::debug!("Plugin name {name} is registered more than once");
        }

        tracing::debug!("Registered {group:?} plugin {name}");
        match group {
            PluginGroup::Custom => self.custom.push(plugin),
            PluginGroup::Standard => self.standard.push(plugin),
        }
        self
    }

    fn register_with<P, F>(self, group: PluginGroup, factory: F) -> Self
    where
        P: ConversionPlugin + 'static,
        F: FnOnce() -> Result<P, PluginFault>,
    {
        match factory() {
            Ok(plugin) => self.register(group, Arc::new(plugin)),
            Err(e) => {
                tracing::warn!("Skipping {group:?} plugin that failed to load: {e}");
                self
            }
        }
    }

    /// Sort both groups and freeze the result.
    pub fn build(self) -> PluginRegistry {
        let Self {
            mut custom,
            mut standard,
            ..
        } = self;
        custom.sort_by(|a, b| a.name().cmp(b.name()));
        standard.sort_by(|a, b| a.name().cmp(b.name()));

        let plugins: Vec<_> = custom.into_iter().chain(standard).collect();
        let registry = PluginRegistry {
            plugins: Arc::from(plugins),
        };
        tracing::info!("Loaded {} conversion plugins: {:?}", registry.len(), registry);
        registry
    }
}
