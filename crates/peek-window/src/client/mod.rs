//! In-page client runtime and its startup configuration.

use peek_common::Theme;
use serde::Serialize;

/// Receives events from the server, renders them and keeps scroll in sync.
pub const SCRIPT: &str = include_str!("../../../../assets/client/script.js");

/// Bundled stylesheet layered over the optional GitHub markdown theme.
pub const STYLE: &str = include_str!("../../../../assets/client/style.css");

/// Values the script reads from `window.peek`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub theme: Theme,
    pub server_url: String,
    pub debug: bool,
}

impl ClientConfig {
    /// Initialization script defining `window.peek` before the page loads.
    pub fn init_script(&self) -> String {
        // Plain strings and booleans; serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".into());
        format!("window.peek = Object.freeze({json});")
    }
}

#[cfg(test)]
mod tests;
