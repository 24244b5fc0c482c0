//! Core TOML config loading: read from path or platform default.

use crate::schema::PeekConfig;
use crate::validation;
use peek_common::ConfigError;
use std::path::Path;
use tracing::{debug, info, warn};

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Missing fields take serde defaults. Validation failures are logged as a
/// warning and the parsed config is returned as-is.
pub fn load_from_path(path: &Path) -> Result<PeekConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: PeekConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}; keeping parsed values");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/peek/config.toml`
/// On Linux: `~/.config/peek/config.toml`
///
/// A missing file is not an error: defaults are returned and nothing is
/// written to disk.
pub fn load_default() -> Result<PeekConfig, ConfigError> {
    let path = match default_config_path() {
        Ok(path) => path,
        Err(e) => {
            debug!("{e}; using default config");
            return Ok(PeekConfig::default());
        }
    };

    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(PeekConfig::default());
    }

    load_from_path(&path)
}
