//! Types shared by the peek server, renderer, and preview window.

pub mod env;
pub mod errors;
pub mod theme;

pub use errors::{ConfigError, PeekError, ProtocolError};
pub use theme::Theme;

pub type Result<T> = std::result::Result<T, PeekError>;
