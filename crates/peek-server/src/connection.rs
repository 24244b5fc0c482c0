//! Per-connection handler: take the command queue, then relay events.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::context::ServerContext;
use crate::protocol::WireEvent;

/// How long the writer may keep flushing after the connection ends.
const WRITER_DRAIN: Duration = Duration::from_secs(1);

/// Handle a single upgraded connection until it closes.
pub async fn handle_connection(ws: WebSocket, peer: SocketAddr, ctx: Arc<ServerContext>) {
    ctx.connection_opened();
    tracing::info!(peer = %peer, "preview connected");

    let (sink, mut stream) = ws.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<Message>();
    let mut writer = tokio::spawn(write_loop(sink, out_rx));

    relay(&mut stream, &out_tx, &ctx, peer).await;
    ctx.connection_closed();
    tracing::info!(peer = %peer, "preview disconnected");

    drop(out_tx);
    if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
        writer.abort();
    }
}

async fn relay(
    stream: &mut SplitStream<WebSocket>,
    out: &mpsc::UnboundedSender<Message>,
    ctx: &ServerContext,
    peer: SocketAddr,
) {
    // Another connection may still own the queue; notice a close while
    // waiting for it.
    let mut commands = tokio::select! {
        guard = ctx.commands.lock() => guard,
        _ = watch_until_closed(stream, peer) => return,
    };

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    // Host is gone; nothing more will arrive.
                    watch_until_closed(stream, peer).await;
                    return;
                };
                match WireEvent::from_command(&command, ctx.renderer.as_ref()) {
                    Ok(event) => {
                        if out.send(Message::Text(event.to_json())).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            action = command.action.as_str(),
                            error = %e,
                            "dropping command"
                        );
                    }
                }
            }

            frame = stream.next() => {
                if !handle_incoming(frame, peer) {
                    return;
                }
            }
        }
    }
}

async fn watch_until_closed(stream: &mut SplitStream<WebSocket>, peer: SocketAddr) {
    while handle_incoming(stream.next().await, peer) {}
}

/// React to one frame from the window. Returns `false` once the connection
/// is finished. Pings are answered by the WebSocket layer itself.
fn handle_incoming(frame: Option<Result<Message, axum::Error>>, peer: SocketAddr) -> bool {
    match frame {
        Some(Ok(Message::Close(_))) | None => false,
        Some(Err(e)) => {
            tracing::debug!(peer = %peer, error = %e, "WS error");
            false
        }
        Some(Ok(_)) => true,
    }
}

async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = sink.send(msg).await {
            tracing::debug!(error = %e, "WS send failed");
            return;
        }
    }
    let _ = sink.close().await;
}
