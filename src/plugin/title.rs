//! Generic plugin that renders the document title as a level-one heading.

use std::path::Path;

use super::{Attempt, ConversionPlugin, first_title, read_html};
use crate::error::PluginFault;

/// Plugin that matches any document with a non-blank `<title>`.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use snapshot_md::{Attempt, ConversionPlugin, TitlePlugin};
///
/// let plugin = TitlePlugin::new();
/// let attempt = plugin.attempt(Path::new("/var/snapshots/index.html"), "").unwrap();
/// if let Attempt::Matched(markdown) = attempt {
///     println!("{markdown}");
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TitlePlugin;

impl TitlePlugin {
    pub const NAME: &'static str = "title";

    pub fn new() -> Self {
        Self
    }
}

impl ConversionPlugin for TitlePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn attempt(&self, html: &Path, _source_url: &str) -> Result<Attempt, PluginFault> {
        let content = read_html(html)?;
        Ok(match first_title(&content) {
            Some(title) => Attempt::Matched(format!("# {title}")),
            None => Attempt::Declined,
        })
    }
}
