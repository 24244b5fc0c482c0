use serde::{Deserialize, Serialize};

/// Markdown rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Turn `[[target|label]]` into links.
    pub wikilinks: bool,
    /// Prefix joined to wiki-link targets as `<base>/<target>`.
    pub wikilink_base_url: String,
    /// Replacement for whitespace in wiki-link targets. Empty keeps it.
    pub wikilink_whitespace: String,
    /// Percent-encode the final wiki-link URL.
    pub wikilink_encode: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wikilinks: true,
            wikilink_base_url: String::new(),
            wikilink_whitespace: String::new(),
            wikilink_encode: false,
        }
    }
}
