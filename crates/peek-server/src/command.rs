//! Host commands read from stdin.
//!
//! A command is an action frame (`show` or `scroll`) followed by one payload
//! frame. Frames with any other action are dropped without consuming a
//! payload.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use peek_common::ProtocolError;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;

use crate::frame::{FrameCodec, FrameError};
use crate::Shutdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Show,
    Scroll,
}

impl Action {
    pub fn from_token(token: &[u8]) -> Result<Self, ProtocolError> {
        match token {
            b"show" => Ok(Action::Show),
            b"scroll" => Ok(Action::Scroll),
            other => Err(ProtocolError::UnknownAction(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Show => "show",
            Action::Scroll => "scroll",
        }
    }
}

/// One host instruction. `Show` carries source text, `Scroll` a line number
/// still in text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub payload: String,
}

impl Command {
    pub fn show(text: impl Into<String>) -> Self {
        Self {
            action: Action::Show,
            payload: text.into(),
        }
    }

    pub fn scroll(line: impl Into<String>) -> Self {
        Self {
            action: Action::Scroll,
            payload: line.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command input failed: {0}")]
    Input(#[from] FrameError),
}

/// Pairs frames from the host stream into commands.
pub struct CommandReader<R> {
    frames: FramedRead<R, FrameCodec>,
    done: bool,
}

impl<R: AsyncRead + Unpin> CommandReader<R> {
    pub fn new(input: R, max_frame_bytes: usize) -> Self {
        Self {
            frames: FramedRead::new(input, FrameCodec::new(max_frame_bytes)),
            done: false,
        }
    }

    /// Next well-formed command, or `None` once the host has closed the stream.
    pub async fn next_command(&mut self) -> Result<Option<Command>, CommandError> {
        loop {
            let Some(token) = self.next_frame().await? else {
                return Ok(None);
            };
            let action = match Action::from_token(&token) {
                Ok(action) => action,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping frame");
                    continue;
                }
            };

            let Some(payload) = self.next_frame().await? else {
                tracing::debug!(action = action.as_str(), "input closed before payload");
                return Ok(None);
            };
            match String::from_utf8(payload.to_vec()) {
                Ok(payload) => return Ok(Some(Command { action, payload })),
                Err(_) => {
                    let e = ProtocolError::InvalidUtf8 {
                        action: action.as_str(),
                    };
                    tracing::warn!(error = %e, "dropping command");
                }
            }
        }
    }

    async fn next_frame(&mut self) -> Result<Option<Bytes>, CommandError> {
        if self.done {
            return Ok(None);
        }
        match self.frames.next().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) if e.is_stream_closed() => {
                tracing::debug!(error = %e, "command input closed");
                self.done = true;
                Ok(None)
            }
            Some(Err(e)) => {
                self.done = true;
                Err(e.into())
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }

    /// View the reader as a stream of commands.
    pub fn into_stream(self) -> impl Stream<Item = Result<Command, CommandError>> {
        futures_util::stream::unfold(self, |mut reader| async move {
            match reader.next_command().await {
                Ok(Some(command)) => Some((Ok(command), reader)),
                Ok(None) => None,
                Err(e) => Some((Err(e), reader)),
            }
        })
    }
}

/// Pump commands from the host into the relay queue, in arrival order.
///
/// Ends quietly when the host closes the stream. A fatal input error is
/// reported on `shutdown`.
pub async fn forward<R>(
    reader: CommandReader<R>,
    queue: mpsc::Sender<Command>,
    shutdown: mpsc::UnboundedSender<Shutdown>,
) where
    R: AsyncRead + Unpin,
{
    let commands = reader.into_stream();
    tokio::pin!(commands);

    while let Some(next) = commands.next().await {
        match next {
            Ok(command) => {
                tracing::debug!(
                    action = command.action.as_str(),
                    bytes = command.payload.len(),
                    "command received"
                );
                if queue.send(command).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                let _ = shutdown.send(Shutdown::InputFailed(e.to_string()));
                return;
            }
        }
    }

    tracing::info!("host closed the command channel");
}
