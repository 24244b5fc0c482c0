//! Window settings handed over by the server through the environment.

use peek_common::{env, PeekError, Theme};

pub const DEFAULT_TITLE: &str = "Peek preview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub theme: Theme,
    pub server_url: String,
    pub title: String,
    pub debug: bool,
}

impl WindowSettings {
    pub fn from_env() -> peek_common::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. `serverUrl` is required; the rest
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> peek_common::Result<Self> {
        let server_url = lookup(env::SERVER_URL)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| PeekError::Window(format!("{} is not set", env::SERVER_URL)))?;

        let theme = match lookup(env::THEME) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, using {}", Theme::default());
                Theme::default()
            }),
            None => Theme::default(),
        };

        Ok(Self {
            theme,
            server_url,
            title: lookup(env::TITLE)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            debug: lookup(env::DEBUG).is_some_and(|v| matches!(v.as_str(), "1" | "true")),
        })
    }
}
