//! Environment variables handed from the server to the preview window process.
//!
//! The window is configured through its environment rather than its argument
//! list, so the server address and theme never pass through a shell.

/// Display theme identifier (`dark` or `light`).
pub const THEME: &str = "theme";

/// Reported `host:port` address of the session server.
pub const SERVER_URL: &str = "serverUrl";

/// Window title override.
pub const TITLE: &str = "PEEK_TITLE";

/// Set to `1` to enable the in-page debug log overlay.
pub const DEBUG: &str = "PEEK_DEBUG";
