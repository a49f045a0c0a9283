//! Conversion plugins that turn a stored HTML document into Markdown.
//!
//! Plugins implement the [`ConversionPlugin`] trait and are ordered by a
//! [`PluginRegistry`](crate::PluginRegistry). The
//! [`ConversionPipeline`](crate::ConversionPipeline) asks each one in turn and
//! keeps the first non-blank answer.
//!
//! Built-in plugins:
//!
//! - [`TitlePlugin`] -- renders the document `<title>` as a heading.
//! - [`SitePlugin`] -- like `TitlePlugin`, but only for URLs matching a
//!   pattern, and appends a link back to the source page.

mod site;
mod title;

use std::path::Path;

use scraper::{Html, Selector};

use crate::error::PluginFault;

pub use site::SitePlugin;
pub use title::TitlePlugin;

/// Outcome of a single [`ConversionPlugin::attempt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attempt {
    /// The plugin produced Markdown. Blank text counts as declined.
    Matched(String),
    /// The plugin does not handle this document.
    Declined,
}

impl Attempt {
    /// Returns the Markdown if this is a match with non-blank content.
    pub fn into_markdown(self) -> Option<String> {
        match self {
            Attempt::Matched(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Trait for strategies that render an HTML document as Markdown.
///
/// Implementations must be `Send + Sync`: one instance is built at startup and
/// shared by every conversion request.
///
/// # Contract
///
/// - Read the document at `html`; never modify or delete it.
/// - Do not assume `source_url` is well-formed. It may be empty.
/// - Signal "not mine" with [`Attempt::Declined`]. Reserve `Err` for
///   conditions the plugin did not expect, such as an unreadable file.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use snapshot_md::{Attempt, ConversionPlugin, PluginFault};
///
/// struct Shout;
///
/// impl ConversionPlugin for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn attempt(&self, _html: &Path, source_url: &str) -> Result<Attempt, PluginFault> {
///         if source_url.is_empty() {
///             return Ok(Attempt::Declined);
///         }
///         Ok(Attempt::Matched(format!("# {}", source_url.to_uppercase())))
///     }
/// }
/// ```
pub trait ConversionPlugin: Send + Sync {
    /// Human-readable identifier, used for ordering and in log messages.
    fn name(&self) -> &str;

    /// Try to convert the document at `html`, captured from `source_url`.
    fn attempt(&self, html: &Path, source_url: &str) -> Result<Attempt, PluginFault>;
}

/// Read an HTML document, decoding invalid UTF-8 lossily.
pub(crate) fn read_html(path: &Path) -> Result<String, PluginFault> {
    let bytes = std::fs::read(path).map_err(|source| PluginFault::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Text of the first non-blank `<title>` element, with runs of ASCII
/// whitespace collapsed to one space. `None` when no title has text.
pub(crate) fn first_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);
    document.select(&selector).find_map(|title| {
        let text = title.text().collect::<String>();
        let text = text.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
        (!text.is_empty()).then_some(text)
    })
}
