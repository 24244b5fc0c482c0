use peek_config::PeekConfig;
use peek_server::settings::{self, LoadedConfig, Settings};
use peek_server::{app, cli, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();

    // Logging settings live in the config, so load it before the subscriber
    // exists and report problems afterwards.
    let loaded = settings::load_config(&args);
    let fallback = PeekConfig::default();
    let config = loaded.as_ref().map_or(&fallback, |loaded| &loaded.config);
    let settings = Settings::resolve(&args, config);

    logging::init(&settings.log_directive, settings.log_file.as_deref());
    tracing::info!("peek v{} starting...", env!("CARGO_PKG_VERSION"));
    match &loaded {
        Ok(LoadedConfig {
            warning: Some(e), ..
        }) => tracing::warn!("Config load failed, using defaults: {e}"),
        Ok(_) => {}
        Err(e) => {
            tracing::error!(error = %e, "cannot load config");
            std::process::exit(1);
        }
    }
    if let Some(path) = &args.config {
        tracing::info!(path = %path.display(), "Using config override");
    }

    let code = match app::run(settings).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "peek failed");
            1
        }
    };

    tracing::info!("Shutdown complete");
    // The stdin reader sits on a blocking thread that would hold up runtime
    // shutdown until the host closes the pipe.
    std::process::exit(code);
}
