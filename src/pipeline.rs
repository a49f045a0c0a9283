//! First-match-wins execution of the plugin chain.
//!
//! Plugins run strictly in registry order. The first one to return non-blank
//! Markdown ends the run; nothing after it is called. A plugin that returns an
//! error or panics is logged and treated exactly like one that declined.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::{ConversionError, Result};
use crate::plugin::{Attempt, ConversionPlugin};
use crate::registry::PluginRegistry;

/// Runs a [`PluginRegistry`] against one document.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use snapshot_md::{ConversionPipeline, PluginRegistry};
///
/// let pipeline = ConversionPipeline::new(PluginRegistry::builtin());
/// let markdown = pipeline.run(Path::new("/var/snapshots/index.html"), "https://hh.ru/vacancy/1");
/// ```
#[derive(Clone, Debug)]
pub struct ConversionPipeline {
    registry: PluginRegistry,
}

impl ConversionPipeline {
    pub fn new(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Convert the document at `html` captured from `source_url`.
    ///
    /// Returns the winning plugin's output verbatim, or
    /// [`ConversionError::NoPluginAvailable`] when the registry is empty, or
    /// [`ConversionError::AllPluginsDeclined`] when nothing matched.
    pub fn run(&self, html: &Path, source_url: &str) -> Result<String> {
        let plugins = self.registry.plugins();
        if plugins.is_empty() {
            tracing::warn!("No conversion plugins registered");
            return Err(ConversionError::NoPluginAvailable);
        }

        for plugin in plugins {
            if let Some(markdown) = attempt_guarded(plugin.as_ref(), html, source_url) {
                tracing::info!("Plugin {} converted {}", plugin.name(), html.display());
                return Ok(markdown);
            }
        }

        tracing::info!(
            "All {} plugins declined {} (url: {source_url:?})",
            plugins.len(),
            html.display()
        );
        Err(ConversionError::AllPluginsDeclined {
            tried: plugins.len(),
        })
    }
}

/// Call one plugin, absorbing errors and panics. `Some` only for non-blank output.
fn attempt_guarded(plugin: &dyn ConversionPlugin, html: &Path, source_url: &str) -> Option<String> {
    let name = plugin.name();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| plugin.attempt(html, source_url)));

    match outcome {
        Ok(Ok(attempt @ Attempt::Matched(_))) => {
            let markdown = attempt.into_markdown();
            if markdown.is_none() {
                tracing::debug!("Plugin {name} returned blank output, treating as declined");
            }
            markdown
        }
        Ok(Ok(Attempt::Declined)) => {
            tracing::debug!("Plugin {name} declined");
            None
        }
        Ok(Err(fault)) => {
            tracing::error!("Plugin {name} faulted: {fault}");
            None
        }
        Err(payload) => {
            tracing::error!("Plugin {name} panicked: {}", panic_message(payload.as_ref()));
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
