//! Preview window configuration types.

use peek_common::Theme;
use serde::{Deserialize, Serialize};

/// Preview window appearance and process settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub theme: Theme,
    /// Static window title.
    pub title: String,
    /// Path to the `peek-window` executable. Empty means auto-detect.
    pub binary: String,
    /// Mirror the page console into an on-screen log box.
    pub debug: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            title: "Peek preview".into(),
            binary: String::new(),
            debug: false,
        }
    }
}
