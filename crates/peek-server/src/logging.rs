//! `tracing` setup: console output on stderr, mirrored to a log file.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "peek=info";

/// Build the filter. `RUST_LOG` wins over `directive`; an unparsable
/// directive falls back to [`DEFAULT_DIRECTIVE`].
pub fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Stdout is never written; it may belong to
/// the host.
pub fn init(directive: &str, file: Option<&Path>) {
    let (log_file, open_error) = match file.map(File::create) {
        Some(Ok(f)) => (Some(Arc::new(f)), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let console = fmt::layer().with_writer(std::io::stderr);
    let mirror = log_file.map(|f| fmt::layer().with_ansi(false).with_writer(f));

    if let Err(e) = tracing_subscriber::registry()
        .with(filter(directive))
        .with(console)
        .with(mirror)
        .try_init()
    {
        eprintln!("peek: logging already initialized: {e}");
    }

    if let (Some(path), Some(e)) = (file, open_error) {
        tracing::warn!(path = %path.display(), error = %e, "cannot open log file, logging to console only");
    }
}
