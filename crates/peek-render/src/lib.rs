//! Render adapter for the preview server.
//!
//! The server only depends on the [`Renderer`] contract: text in, HTML plus a
//! line count out. [`MarkdownRenderer`] is the bundled implementation; it
//! tags every block element with the 1-based source line it starts on
//! (`data-line-begin`) so the page can follow the editor cursor.

mod lines;
pub mod markdown;
pub mod wikilinks;

pub use lines::{line_count, LineIndex};
pub use markdown::{MarkdownOptions, MarkdownRenderer};
pub use wikilinks::WikiLinkOptions;

/// Attribute carrying the first source line of a rendered block.
pub const LINE_ATTR: &str = "data-line-begin";

/// Output of a single render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub html: String,
    /// Number of lines in the source; always at least 1.
    pub line_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Failed(String),
}

/// Converts source text into annotated HTML.
pub trait Renderer: Send + Sync {
    fn render(&self, source: &str) -> Result<RenderResult, RenderError>;
}
