//! Wires the pieces together for one preview session.

use std::sync::Arc;

use peek_common::PeekError;
use tokio::sync::mpsc;

use crate::command::{self, CommandReader};
use crate::context::ServerContext;
use crate::launcher::{resolve_window_binary, WindowLauncher};
use crate::server::{display_addr, Server};
use crate::settings::Settings;
use crate::{signals, Shutdown};

/// Commands buffered while no window is consuming them.
const COMMAND_QUEUE: usize = 1024;

/// Run until the window exits, the idle timer fires, or a signal arrives.
pub async fn run(settings: Settings) -> peek_common::Result<()> {
    let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel();
    signals::install(shutdown_tx.clone())?;

    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
    let ctx = ServerContext::new(
        Arc::new(settings.renderer()),
        command_rx,
        settings.idle_timeout,
        shutdown_tx.clone(),
    );

    let server = Server::bind(&settings.host, settings.port, ctx).await?;
    let local = server.local_addr()?;
    let server_url = display_addr(local);
    tracing::info!(addr = %local, url = %server_url, "preview server listening");

    let reader = CommandReader::new(tokio::io::stdin(), settings.max_frame_bytes);
    tokio::spawn(command::forward(reader, command_tx, shutdown_tx));
    tokio::spawn(server.run());

    let launcher = WindowLauncher {
        program: resolve_window_binary(settings.window_bin.as_deref()),
        theme: settings.theme,
        server_url,
        title: settings.title.clone(),
        debug: settings.debug,
    };
    let mut window = launcher.spawn()?;

    tokio::select! {
        status = window.wait() => {
            match status {
                Ok(status) => tracing::info!(%status, "preview window exited"),
                Err(e) => tracing::warn!(error = %e, "lost track of preview window"),
            }
            Ok(())
        }
        reason = shutdown_rx.recv() => {
            window.kill();
            match reason {
                Some(Shutdown::InputFailed(message)) => Err(PeekError::Other(message)),
                Some(Shutdown::Signal(name)) => {
                    tracing::info!(signal = name, "terminating on signal");
                    Ok(())
                }
                Some(Shutdown::IdleTimeout) | None => Ok(()),
            }
        }
    }
}
