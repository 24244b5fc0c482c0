//! Page assets served over the `peek://` custom protocol.
//!
//! The page, its script and its bundled stylesheet live in memory. Optional
//! third-party stylesheets (GitHub markdown, KaTeX) are read from the cache
//! directory when they have been downloaded there.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SCHEME: &str = "peek";

/// URL the WebView opens on start.
pub const INDEX_URL: &str = "peek://localhost/index.html";

/// Serves page assets by request path.
pub struct ContentProvider {
    /// Directory holding cached stylesheets, if one is known.
    cache_dir: Option<PathBuf>,
    overrides: HashMap<String, (&'static str, Vec<u8>)>, // path -> (mime, data)
}

impl ContentProvider {
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir,
            overrides: HashMap::new(),
        }
    }

    /// Default cache location: `<cache_dir>/peek/`.
    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("peek"))
    }

    /// Register an in-memory asset.
    pub fn add(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        let path = path.into();
        let mime = mime_from_extension(Path::new(&path));
        self.overrides.insert(path, (mime, data.into()));
    }

    /// Whether `name` can be served from the cache directory.
    pub fn has_cached(&self, name: &str) -> bool {
        self.cached_path(name).is_some()
    }

    /// Resolve a request path to MIME type and content.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Cow<'_, [u8]>)> {
        let clean = path.trim_start_matches('/');
        let clean = clean.split(['?', '#']).next().unwrap_or_default();

        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((*mime, Cow::Borrowed(data.as_slice())));
        }

        let file = self.cached_path(clean)?;
        let data = std::fs::read(&file).ok()?;
        Some((mime_from_extension(&file), Cow::Owned(data)))
    }

    fn cached_path(&self, name: &str) -> Option<PathBuf> {
        let base = self.cache_dir.as_ref()?;
        // Canonicalize both sides so `..` and symlinks cannot escape the cache.
        let canonical_base = std::fs::canonicalize(base).ok()?;
        let canonical_file = std::fs::canonicalize(base.join(name)).ok()?;
        (canonical_file.starts_with(&canonical_base) && canonical_file.is_file())
            .then_some(canonical_file)
    }
}

/// Request path of a `peek://` URI.
///
/// WebView2 rewrites custom schemes to `http://peek.localhost/...`, so that
/// form is accepted too.
pub fn request_path(uri: &str) -> &str {
    uri.strip_prefix("peek://localhost/")
        .or_else(|| uri.strip_prefix("peek://localhost"))
        .or_else(|| uri.strip_prefix("http://peek.localhost/"))
        .or_else(|| uri.strip_prefix("peek://"))
        .unwrap_or("")
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("ttf") => "font/ttf",
        _ => "application/octet-stream",
    }
}
