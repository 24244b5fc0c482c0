//! Spawns and supervises the preview window process.
//!
//! Everything the window needs is passed through its environment; it takes
//! no arguments.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use peek_common::{env, PeekError, Theme};
use tokio::process::{Child, Command};

/// File name of the preview window binary.
pub const WINDOW_BIN: &str = if cfg!(windows) {
    "peek-window.exe"
} else {
    "peek-window"
};

#[derive(Debug, Clone)]
pub struct WindowLauncher {
    pub program: PathBuf,
    pub theme: Theme,
    /// `host:port` of the session server.
    pub server_url: String,
    pub title: String,
    pub debug: bool,
}

impl WindowLauncher {
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.env(env::THEME, self.theme.as_str())
            .env(env::SERVER_URL, &self.server_url)
            .env(env::TITLE, &self.title)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true);
        if self.debug {
            cmd.env(env::DEBUG, "1");
        }
        cmd
    }

    /// Start the window. Failure is not retried.
    pub fn spawn(&self) -> peek_common::Result<WindowProcess> {
        let child = self.command().spawn().map_err(|source| PeekError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        tracing::info!(
            program = %self.program.display(),
            pid = child.id().unwrap_or_default(),
            server = %self.server_url,
            "preview window started"
        );
        Ok(WindowProcess { child })
    }
}

pub struct WindowProcess {
    child: Child,
}

impl WindowProcess {
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Ask the OS to kill the window without waiting for it.
    pub fn kill(&mut self) {
        if let Err(e) = self.child.start_kill() {
            tracing::debug!(error = %e, "failed to kill preview window");
        }
    }
}

/// Locate the window binary.
///
/// An explicitly configured path wins. Otherwise prefer a binary installed
/// next to the running executable, then fall back to `PATH` lookup.
pub fn resolve_window_binary(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return path.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| sibling_binary(&exe))
        .unwrap_or_else(|| PathBuf::from(WINDOW_BIN))
}

fn sibling_binary(exe: &Path) -> Option<PathBuf> {
    let candidate = exe.parent()?.join(WINDOW_BIN);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsStr;

    fn launcher(program: &str) -> WindowLauncher {
        WindowLauncher {
            program: PathBuf::from(program),
            theme: Theme::Light,
            server_url: "localhost:4242".into(),
            title: "notes.md".into(),
            debug: false,
        }
    }

    fn envs(cmd: &Command) -> HashMap<String, Option<String>> {
        cmd.as_std()
            .get_envs()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.map(|v| v.to_string_lossy().into_owned()),
                )
            })
            .collect()
    }

    #[test]
    fn passes_settings_through_environment() {
        let cmd = launcher("peek-window").command();
        let envs = envs(&cmd);
        assert_eq!(envs["theme"].as_deref(), Some("light"));
        assert_eq!(envs["serverUrl"].as_deref(), Some("localhost:4242"));
        assert_eq!(envs["PEEK_TITLE"].as_deref(), Some("notes.md"));
        assert!(!envs.contains_key("PEEK_DEBUG"));
        assert_eq!(cmd.as_std().get_args().count(), 0);
        assert_eq!(cmd.as_std().get_program(), OsStr::new("peek-window"));
    }

    #[test]
    fn debug_flag_sets_env() {
        let mut l = launcher("peek-window");
        l.debug = true;
        assert_eq!(envs(&l.command())["PEEK_DEBUG"].as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let err = launcher("/nonexistent/peek-window-missing")
            .spawn()
            .err()
            .unwrap();
        assert!(matches!(err, PeekError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn waits_for_window_exit() {
        let mut window = launcher("/bin/true").spawn().unwrap();
        let status = window.wait().await.unwrap();
        assert!(status.success());
    }

    #[test]
    fn configured_binary_wins() {
        let path = Path::new("/opt/peek/bin/window");
        assert_eq!(resolve_window_binary(Some(path)), path);
    }

    #[test]
    fn empty_configured_path_is_ignored() {
        let resolved = resolve_window_binary(Some(Path::new("")));
        assert!(resolved.ends_with(WINDOW_BIN));
    }

    #[test]
    fn sibling_binary_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("peek");
        assert_eq!(sibling_binary(&exe), None);

        std::fs::write(dir.path().join(WINDOW_BIN), b"").unwrap();
        assert_eq!(sibling_binary(&exe), Some(dir.path().join(WINDOW_BIN)));
    }
}
