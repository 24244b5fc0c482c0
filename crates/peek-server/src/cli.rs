use std::path::PathBuf;

use clap::Parser;
use peek_common::Theme;

/// peek — live markdown preview driven by an editor over stdin.
#[derive(Parser, Debug, Default)]
#[command(name = "peek", version, about)]
pub struct Args {
    /// Address to bind the preview server to.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (0 picks a free port).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Window theme (dark, light).
    #[arg(short, long)]
    pub theme: Option<Theme>,

    /// Exit when no window has been connected for this long.
    #[arg(long)]
    pub idle_timeout_ms: Option<u64>,

    /// Path to the preview window binary.
    #[arg(long)]
    pub window_bin: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `peek=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file path; an empty value disables file logging.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show the debug console overlay in the window.
    #[arg(long)]
    pub debug: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "peek",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--theme",
            "light",
            "--idle-timeout-ms",
            "500",
            "--window-bin",
            "/usr/bin/peek-window",
            "--log-level",
            "peek=debug",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.theme, Some(Theme::Light));
        assert_eq!(args.idle_timeout_ms, Some(500));
        assert_eq!(args.window_bin, Some(PathBuf::from("/usr/bin/peek-window")));
        assert_eq!(args.log_level.as_deref(), Some("peek=debug"));
        assert!(args.debug);
    }

    #[test]
    fn no_flags_leaves_everything_unset() {
        let args = Args::try_parse_from(["peek"]).unwrap();
        assert!(args.host.is_none());
        assert!(args.theme.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(Args::try_parse_from(["peek", "--theme", "sepia"]).is_err());
    }
}
