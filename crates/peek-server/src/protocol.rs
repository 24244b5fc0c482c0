//! Events pushed to the preview window. Each one is a single JSON text frame.

use peek_common::ProtocolError;
use peek_render::{RenderError, Renderer};
use serde::Serialize;

use crate::command::{Action, Command};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum WireEvent {
    Show { html: String, lcount: usize },
    Scroll { line: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl WireEvent {
    /// Turn one host command into the event the window should see.
    pub fn from_command(command: &Command, renderer: &dyn Renderer) -> Result<Self, EventError> {
        match command.action {
            Action::Show => {
                let rendered = renderer.render(&command.payload)?;
                Ok(WireEvent::Show {
                    html: rendered.html,
                    lcount: rendered.line_count,
                })
            }
            Action::Scroll => Ok(WireEvent::Scroll {
                line: parse_line(&command.payload)?,
            }),
        }
    }

    pub fn to_json(&self) -> String {
        // Two plain variants of strings and integers; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn parse_line(payload: &str) -> Result<u64, ProtocolError> {
    let trimmed = payload.trim();
    trimmed
        .parse()
        .map_err(|_| ProtocolError::InvalidLine(trimmed.to_string()))
}
