//! peek configuration.
//!
//! TOML-based configuration for the preview server and window. Every section
//! uses serde defaults so a partial (or missing) file works out of the box;
//! command-line flags are layered on top by the binaries.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LoggingConfig, PeekConfig, RenderConfig, ServerConfig, WindowConfig};

use std::path::Path;

use peek_common::ConfigError;

/// Load config from `path` if given, otherwise from the platform default.
///
/// An explicit path that does not exist is an error; a missing default file
/// just yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<PeekConfig, ConfigError> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            toml_loader::load_from_path(path)
        }
        None => toml_loader::load_default(),
    }
}
