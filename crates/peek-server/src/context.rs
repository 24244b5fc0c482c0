//! Process-wide server state shared by every connection handler.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use peek_render::Renderer;
use tokio::sync::mpsc;

use crate::command::Command;
use crate::idle::IdleTimer;
use crate::Shutdown;

/// Idle-lifecycle state, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No connection open; the idle timer is running.
    Idle,
    /// At least one connection open; the idle timer is stopped.
    Active,
}

struct Lifecycle {
    connections: usize,
    timer: IdleTimer,
}

pub struct ServerContext {
    pub renderer: Arc<dyn Renderer>,
    /// Receiving end of the command queue. A connection holds the lock for as
    /// long as it relays, so only one window consumes commands at a time.
    pub commands: tokio::sync::Mutex<mpsc::Receiver<Command>>,
    lifecycle: Mutex<Lifecycle>,
}

impl ServerContext {
    /// Build the context and arm the idle timer. Must be called inside a
    /// tokio runtime.
    pub fn new(
        renderer: Arc<dyn Renderer>,
        commands: mpsc::Receiver<Command>,
        idle_grace: Duration,
        shutdown: mpsc::UnboundedSender<Shutdown>,
    ) -> Arc<Self> {
        let mut timer = IdleTimer::new(idle_grace, shutdown);
        timer.arm();
        Arc::new(Self {
            renderer,
            commands: tokio::sync::Mutex::new(commands),
            lifecycle: Mutex::new(Lifecycle {
                connections: 0,
                timer,
            }),
        })
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        // The guarded data stays consistent even if a holder panicked.
        self.lifecycle.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn connection_opened(&self) {
        let mut lc = self.lifecycle();
        lc.connections += 1;
        lc.timer.cancel();
        tracing::debug!(connections = lc.connections, "connection opened");
    }

    pub fn connection_closed(&self) {
        let mut lc = self.lifecycle();
        lc.connections = lc.connections.saturating_sub(1);
        if lc.connections == 0 {
            lc.timer.arm();
        }
        tracing::debug!(connections = lc.connections, "connection closed");
    }

    pub fn connections(&self) -> usize {
        self.lifecycle().connections
    }

    pub fn state(&self) -> LifecycleState {
        if self.lifecycle().connections == 0 {
            LifecycleState::Idle
        } else {
            LifecycleState::Active
        }
    }

    pub fn idle_timer_armed(&self) -> bool {
        self.lifecycle().timer.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peek_render::MarkdownRenderer;

    const GRACE: Duration = Duration::from_millis(2000);

    fn context() -> (Arc<ServerContext>, mpsc::UnboundedReceiver<Shutdown>) {
        let (_cmd_tx, cmd_rx) = mpsc::channel(8);
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = ServerContext::new(Arc::new(MarkdownRenderer::default()), cmd_rx, GRACE, tx);
        (ctx, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_and_times_out() {
        let (ctx, mut rx) = context();
        assert_eq!(ctx.state(), LifecycleState::Idle);
        assert!(ctx.idle_timer_armed());

        tokio::time::sleep(GRACE + Duration::from_millis(1)).await;
        assert!(matches!(rx.recv().await, Some(Shutdown::IdleTimeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn connection_suspends_timer_until_close() {
        let (ctx, mut rx) = context();
        tokio::time::sleep(Duration::from_millis(1000)).await;

        ctx.connection_opened();
        assert_eq!(ctx.state(), LifecycleState::Active);
        assert!(!ctx.idle_timer_armed());

        tokio::time::sleep(GRACE * 5).await;
        assert!(rx.try_recv().is_err());

        ctx.connection_closed();
        assert_eq!(ctx.state(), LifecycleState::Idle);
        assert!(ctx.idle_timer_armed());

        tokio::time::sleep(GRACE - Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(matches!(rx.recv().await, Some(Shutdown::IdleTimeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_waits_for_last_connection() {
        let (ctx, mut rx) = context();
        ctx.connection_opened();
        ctx.connection_opened();
        ctx.connection_closed();
        assert_eq!(ctx.connections(), 1);
        assert_eq!(ctx.state(), LifecycleState::Active);

        tokio::time::sleep(GRACE * 2).await;
        assert!(rx.try_recv().is_err());

        ctx.connection_closed();
        assert_eq!(ctx.state(), LifecycleState::Idle);
    }
}
