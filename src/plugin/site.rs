//! Site-specific plugin keyed on the source URL.

use std::path::Path;

use regex::Regex;

use super::{Attempt, ConversionPlugin, first_title, read_html};
use crate::error::PluginFault;

/// Plugin that only handles documents whose source URL matches a pattern.
///
/// On a match it renders the title as a heading followed by a link back to
/// the source page. URLs that do not match are declined without touching the
/// HTML.
///
/// The pattern is searched, not fully matched: anchor it with `^` to require a
/// prefix. Anything after the matched part (extra path segments, a query
/// string) is allowed.
///
/// # Example
///
/// ```
/// use snapshot_md::{ConversionPlugin, SitePlugin};
///
/// let plugin = SitePlugin::new("docs-rs", r"^https://docs\.rs/[\w-]+", "Open docs").unwrap();
/// assert_eq!(plugin.name(), "docs-rs");
/// assert!(plugin.handles("https://docs.rs/serde/latest/serde/"));
/// assert!(!plugin.handles("https://crates.io/crates/serde"));
/// ```
#[derive(Clone, Debug)]
pub struct SitePlugin {
    name: String,
    pattern: Regex,
    link_label: String,
}

impl SitePlugin {
    /// Name of the built-in hh.ru vacancy plugin.
    pub const HH_VACANCY: &'static str = "hh-vacancy";

    /// Create a plugin from a URL regex and the label of the appended link.
    ///
    /// Fails with [`PluginFault::Init`] if `pattern` is not a valid regex.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        link_label: impl Into<String>,
    ) -> Result<Self, PluginFault> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            link_label: link_label.into(),
        })
    }

    /// Plugin for hh.ru vacancy pages (`/vacancy/<numeric id>`).
    pub fn hh_vacancy() -> Self {
        Self {
            name: Self::HH_VACANCY.to_string(),
            pattern: Regex::new(r"^https?://([A-Za-z0-9-]+\.)*hh\.ru/vacancy/\d+")
                .expect("hh.ru vacancy pattern is valid"),
            link_label: "Открыть вакансию".to_string(),
        }
    }

    /// Returns `true` if `source_url` matches this plugin's pattern.
    pub fn handles(&self, source_url: &str) -> bool {
        self.pattern.is_match(source_url)
    }
}

impl ConversionPlugin for SitePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn attempt(&self, html: &Path, source_url: &str) -> Result<Attempt, PluginFault> {
        if !self.handles(source_url) {
            return Ok(Attempt::Declined);
        }

        let content = read_html(html)?;
        Ok(match first_title(&content) {
            Some(title) => Attempt::Matched(format!(
                "# {title}\n\n[{}]({source_url})",
                self.link_label
            )),
            None => Attempt::Declined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(tmp: &TempDir, html: &str) -> std::path::PathBuf {
        let path = tmp.path().join("index.html");
        std::fs::write(&path, html).unwrap();
        path
    }

    #[test]
    fn hh_vacancy_renders_title_and_link() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "<title>Backend Engineer</title>");
        let attempt = SitePlugin::hh_vacancy()
            .attempt(&path, "https://hh.ru/vacancy/12345")
            .unwrap();
        assert_eq!(
            attempt,
            Attempt::Matched(
                "# Backend Engineer\n\n[Открыть вакансию](https://hh.ru/vacancy/12345)".into()
            )
        );
    }

    #[test]
    fn hh_vacancy_matches_subdomains_and_query_strings() {
        let plugin = SitePlugin::hh_vacancy();
        assert!(plugin.handles("https://spb.hh.ru/vacancy/987"));
        assert!(plugin.handles("http://hh.ru/vacancy/12345?from=search&query=rust"));
        assert!(plugin.handles("https://hh.ru/vacancy/12345/responses"));
    }

    #[test]
    fn hh_vacancy_rejects_other_urls() {
        let plugin = SitePlugin::hh_vacancy();
        assert!(!plugin.handles(""));
        assert!(!plugin.handles("https://example.com/other"));
        assert!(!plugin.handles("https://hh.ru/vacancy/"));
        assert!(!plugin.handles("https://hh.ru/employer/12345"));
        assert!(!plugin.handles("https://example.com/?next=https://hh.ru/vacancy/1"));
        assert!(!plugin.handles("::not a url::"));
    }

    #[test]
    fn non_matching_url_declines_without_reading_html() {
        let tmp = TempDir::new().unwrap();
        // The file does not exist: reading it would be a fault.
        let missing = tmp.path().join("index.html");
        let attempt = SitePlugin::hh_vacancy()
            .attempt(&missing, "https://example.com/other")
            .unwrap();
        assert_eq!(attempt, Attempt::Declined);
    }

    #[test]
    fn matching_url_without_title_declines() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "<body>no title</body>");
        let attempt = SitePlugin::hh_vacancy()
            .attempt(&path, "https://hh.ru/vacancy/1")
            .unwrap();
        assert_eq!(attempt, Attempt::Declined);
    }

    #[test]
    fn invalid_pattern_fails_to_build() {
        let result = SitePlugin::new("broken", "([unclosed", "Open");
        assert!(matches!(result, Err(PluginFault::Init(_))));
    }
}
