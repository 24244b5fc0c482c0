//! Process signals. Any of them ends the program immediately.

use tokio::sync::mpsc;

use crate::Shutdown;

/// Install handlers and report the first signal on `shutdown`.
#[cfg(unix)]
pub fn install(shutdown: mpsc::UnboundedSender<Shutdown>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let kinds = [
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::terminate(), "SIGTERM"),
        (SignalKind::pipe(), "SIGPIPE"),
        (SignalKind::hangup(), "SIGHUP"),
        (SignalKind::user_defined2(), "SIGUSR2"),
    ];

    for (kind, name) in kinds {
        let mut stream = signal(kind)?;
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if stream.recv().await.is_some() {
                let _ = shutdown.send(Shutdown::Signal(name));
            }
        });
    }
    Ok(())
}

#[cfg(windows)]
pub fn install(shutdown: mpsc::UnboundedSender<Shutdown>) -> std::io::Result<()> {
    use tokio::signal::windows::{ctrl_break, ctrl_c};

    let mut c = ctrl_c()?;
    let tx = shutdown.clone();
    tokio::spawn(async move {
        if c.recv().await.is_some() {
            let _ = tx.send(Shutdown::Signal("Ctrl-C"));
        }
    });

    let mut brk = ctrl_break()?;
    tokio::spawn(async move {
        if brk.recv().await.is_some() {
            let _ = shutdown.send(Shutdown::Signal("Ctrl-Break"));
        }
    });
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_sigusr2() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        install(tx).unwrap();

        let pid = std::process::id() as i32;
        let status = std::process::Command::new("kill")
            .args(["-USR2", &pid.to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        assert!(matches!(rx.recv().await, Some(Shutdown::Signal("SIGUSR2"))));
    }
}
