use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// A command on the host channel that could not be interpreted.
///
/// These are recovered locally: the offending command is dropped and the
/// reader keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    #[error("{action} payload is not valid UTF-8")]
    InvalidUtf8 { action: &'static str },

    #[error("invalid line number: {0:?}")]
    InvalidLine(String),

    #[error("invalid frame header: {0:?}")]
    InvalidHeader(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PeekError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn preview window {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("window error: {0}")]
    Window(String),

    #[error("{0}")]
    Other(String),
}
