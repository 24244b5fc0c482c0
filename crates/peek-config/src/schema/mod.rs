//! Configuration schema types for peek.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod render;
mod server;
mod window;

pub use logging::*;
pub use render::*;
pub use server::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeekConfig {
    pub server: ServerConfig,
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}
