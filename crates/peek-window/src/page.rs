//! The preview page shell.

use crate::content::ContentProvider;

/// Stylesheets picked up from the cache directory when present.
pub const CACHED_STYLESHEETS: &[&str] = &["github-markdown.min.css", "katex.min.css"];

#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    pub title: String,
    /// Cached stylesheets to link, in order.
    pub stylesheets: Vec<String>,
    pub debug: bool,
}

impl PageOptions {
    /// Link every cached stylesheet the provider can serve.
    pub fn with_available_stylesheets(mut self, content: &ContentProvider) -> Self {
        self.stylesheets = CACHED_STYLESHEETS
            .iter()
            .filter(|name| content.has_cached(name))
            .map(|name| name.to_string())
            .collect();
        self
    }
}

pub fn build_page(opts: &PageOptions) -> String {
    let mut links = String::new();
    for sheet in &opts.stylesheets {
        links.push_str(&format!(
            "    <link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(sheet)
        ));
    }
    let debug = if opts.debug {
        "    <pre id=\"peek-debug\"></pre>\n"
    } else {
        ""
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n    \
         <meta charset=\"utf-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n    \
         <title>{title}</title>\n\
         {links}    \
         <link rel=\"stylesheet\" href=\"style.css\">\n\
         </head>\n\
         <body>\n    \
         <main id=\"markdown-body\" class=\"markdown-body\"></main>\n\
         {debug}    \
         <script src=\"script.js\"></script>\n\
         </body>\n\
         </html>\n",
        title = escape_html(&opts.title),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
