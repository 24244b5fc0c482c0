use serde::{Deserialize, Serialize};

/// Session server binding and lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind. `0.0.0.0` is reported to the window as `localhost`.
    pub host: String,
    /// Port to bind; 0 picks an ephemeral port.
    pub port: u16,
    /// Grace period without a preview connection before the process exits.
    pub idle_timeout_ms: u64,
    /// Largest stdin frame accepted from the host editor.
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            idle_timeout_ms: 2000,
            max_frame_bytes: 64 * 1024 * 1024,
        }
    }
}
