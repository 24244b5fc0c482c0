//! Length-prefixed framing for the host command channel.
//!
//! Each frame is a decimal byte count on its own line followed by exactly
//! that many payload bytes:
//!
//! ```text
//! 4\nshow13\n# Hello\nWorld
//! ```
//!
//! is two frames, `show` and `# Hello\nWorld`. A header line that is not a
//! number is logged and skipped, and decoding resumes on the next line. A
//! length above the configured limit is fatal, however many digits it has.

use std::io;

use bytes::{Bytes, BytesMut};
use peek_common::ProtocolError;
use tokio_util::codec::Decoder;

/// Longest accepted header line, excluding the newline.
pub const MAX_HEADER_LEN: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: u128, max: usize },

    #[error("input ended inside a frame ({buffered} bytes buffered)")]
    Truncated { buffered: usize },
}

impl FrameError {
    /// Whether this error just means the host went away.
    ///
    /// The host closing its end of the pipe (or dying mid-frame) ends the
    /// command sequence normally; anything else is a real input failure.
    pub fn is_stream_closed(&self) -> bool {
        match self {
            FrameError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            ),
            FrameError::Truncated { .. } => true,
            FrameError::TooLarge { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Payload(usize),
    /// Dropping an overlong header up to its newline.
    Discard,
}

/// `tokio_util` decoder yielding one `Bytes` per frame.
#[derive(Debug)]
pub struct FrameCodec {
    max_len: usize,
    state: State,
}

impl FrameCodec {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            state: State::Header,
        }
    }
}

/// Up to 20 digits always fit in a `u128`.
fn parse_header(line: &[u8]) -> Result<u128, ProtocolError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let invalid = || ProtocolError::InvalidHeader(String::from_utf8_lossy(line).into_owned());

    if line.is_empty() || line.len() > MAX_HEADER_LEN || !line.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(invalid)
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, FrameError> {
        loop {
            match self.state {
                State::Header => {
                    let Some(newline) = src.iter().position(|&b| b == b'\n') else {
                        if src.len() > MAX_HEADER_LEN + 1 {
                            tracing::warn!(
                                buffered = src.len(),
                                "frame header too long, skipping to next line"
                            );
                            src.clear();
                            self.state = State::Discard;
                        }
                        return Ok(None);
                    };

                    let line = src.split_to(newline + 1);
                    match parse_header(&line[..newline]) {
                        Ok(len) => match usize::try_from(len) {
                            Ok(len) if len <= self.max_len => {
                                src.reserve(len);
                                self.state = State::Payload(len);
                            }
                            _ => {
                                return Err(FrameError::TooLarge {
                                    len,
                                    max: self.max_len,
                                });
                            }
                        },
                        Err(e) => {
                            tracing::warn!(error = %e, "skipping malformed frame header");
                        }
                    }
                }
                State::Payload(len) => {
                    if src.len() < len {
                        return Ok(None);
                    }
                    self.state = State::Header;
                    return Ok(Some(src.split_to(len).freeze()));
                }
                State::Discard => match src.iter().position(|&b| b == b'\n') {
                    Some(newline) => {
                        let _ = src.split_to(newline + 1);
                        self.state = State::Header;
                    }
                    None => {
                        src.clear();
                        return Ok(None);
                    }
                },
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, FrameError> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        match self.state {
            State::Header if src.is_empty() => Ok(None),
            State::Discard => Ok(None),
            _ => Err(FrameError::Truncated {
                buffered: src.len(),
            }),
        }
    }
}

/// Encode one frame. Hosts and tests use this to speak the protocol.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = format!("{}\n", payload.len()).into_bytes();
    out.extend_from_slice(payload);
    out
}
