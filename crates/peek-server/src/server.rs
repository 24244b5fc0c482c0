//! Listening socket and per-connection dispatch.
//!
//! Only WebSocket upgrades are served, on any path. Any other HTTP request
//! gets `501 Not Implemented`.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use peek_common::PeekError;
use tokio::net::TcpListener;

use crate::connection::handle_connection;
use crate::context::ServerContext;

pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServerContext>,
}

impl Server {
    pub async fn bind(host: &str, port: u16, ctx: Arc<ServerContext>) -> peek_common::Result<Self> {
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|source| PeekError::Bind {
                addr: format!("{host}:{port}"),
                source,
            })?;
        Ok(Self { listener, ctx })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve connections until the task is dropped.
    pub async fn run(self) {
        let app = router(self.ctx).into_make_service_with_connect_info::<SocketAddr>();
        if let Err(e) = axum::serve(self.listener, app).await {
            tracing::error!(error = %e, "preview server stopped");
        }
    }
}

/// Every request lands on the same handler regardless of path.
fn router(ctx: Arc<ServerContext>) -> Router {
    Router::new().fallback(upgrade_or_reject).with_state(ctx)
}

async fn upgrade_or_reject(
    State(ctx): State<Arc<ServerContext>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    match ws {
        Some(ws) => ws
            .on_failed_upgrade(move |e| {
                tracing::warn!(peer = %peer, error = %e, "WS handshake failed");
            })
            .on_upgrade(move |socket| handle_connection(socket, peer, ctx)),
        None => {
            tracing::debug!(peer = %peer, "rejecting non-upgrade request");
            StatusCode::NOT_IMPLEMENTED.into_response()
        }
    }
}

/// `host:port`, with the unspecified IPv4 address shown as `localhost`.
pub fn display_addr(addr: SocketAddr) -> String {
    match addr {
        SocketAddr::V4(v4) if v4.ip().is_unspecified() => format!("localhost:{}", v4.port()),
        other => other.to_string(),
    }
}
