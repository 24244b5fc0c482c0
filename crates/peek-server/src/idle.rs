//! Countdown that ends the program when no preview window is connected.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::Shutdown;

pub struct IdleTimer {
    grace: Duration,
    shutdown: mpsc::UnboundedSender<Shutdown>,
    pending: Option<JoinHandle<()>>,
}

impl IdleTimer {
    pub fn new(grace: Duration, shutdown: mpsc::UnboundedSender<Shutdown>) -> Self {
        Self {
            grace,
            shutdown,
            pending: None,
        }
    }

    /// Start counting down from the full grace period.
    ///
    /// Re-arming an armed timer restarts it.
    pub fn arm(&mut self) {
        self.cancel();
        let grace = self.grace;
        let shutdown = self.shutdown.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            tracing::info!(grace_ms = grace.as_millis() as u64, "no preview connected, shutting down");
            let _ = shutdown.send(Shutdown::IdleTimeout);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
