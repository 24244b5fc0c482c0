use std::process::ExitCode;

use peek_window::{ContentProvider, PreviewApp, WindowSettings};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("peek=info")),
        )
        .init();

    let settings = match WindowSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    #[cfg(target_os = "linux")]
    if let Err(e) = gtk::init() {
        tracing::error!("Failed to initialize GTK: {e}");
        return ExitCode::FAILURE;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = PreviewApp::new(settings, ContentProvider::default_cache_dir());
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }

    match app.take_error() {
        Some(_) => ExitCode::FAILURE,
        None => ExitCode::SUCCESS,
    }
}
