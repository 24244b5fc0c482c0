//! peek preview server.
//!
//! Reads `show`/`scroll` commands from the editor on stdin, renders them and
//! pushes the results over a WebSocket to a spawned preview window. The
//! program ends when the window exits, when no window has been connected for
//! the idle grace period, or on a termination signal.

pub mod app;
pub mod cli;
pub mod command;
pub mod connection;
pub mod context;
pub mod frame;
pub mod idle;
pub mod launcher;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod settings;
pub mod signals;


pub use command::{Action, Command, CommandReader};
pub use context::{LifecycleState, ServerContext};
pub use protocol::WireEvent;
pub use server::{display_addr, Server};

/// Why the program is ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shutdown {
    IdleTimeout,
    Signal(&'static str),
    /// The command channel failed in a way that cannot be recovered.
    InputFailed(String),
}
