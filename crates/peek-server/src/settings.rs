//! Effective runtime settings: command-line flags over config file over
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use peek_common::{PeekError, Theme};
use peek_config::{PeekConfig, RenderConfig};
use peek_render::{MarkdownOptions, MarkdownRenderer, WikiLinkOptions};

use crate::cli::Args;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub idle_timeout: Duration,
    pub max_frame_bytes: usize,
    pub theme: Theme,
    pub title: String,
    /// Explicit window binary, if any.
    pub window_bin: Option<PathBuf>,
    pub debug: bool,
    pub log_directive: String,
    pub log_file: Option<PathBuf>,
    pub render: RenderConfig,
}

impl Settings {
    pub fn resolve(args: &Args, config: &PeekConfig) -> Self {
        let window_bin = args
            .window_bin
            .clone()
            .or_else(|| non_empty(&config.window.binary).map(PathBuf::from));
        let log_file = match &args.log_file {
            Some(path) if path.as_os_str().is_empty() => None,
            Some(path) => Some(path.clone()),
            None => non_empty(&config.logging.file).map(PathBuf::from),
        };

        Self {
            host: args
                .host
                .clone()
                .unwrap_or_else(|| config.server.host.clone()),
            port: args.port.unwrap_or(config.server.port),
            idle_timeout: Duration::from_millis(
                args.idle_timeout_ms.unwrap_or(config.server.idle_timeout_ms),
            ),
            max_frame_bytes: config.server.max_frame_bytes,
            theme: args.theme.unwrap_or(config.window.theme),
            title: config.window.title.clone(),
            window_bin,
            debug: args.debug || config.window.debug,
            log_directive: args
                .log_level
                .clone()
                .unwrap_or_else(|| config.logging.level.clone()),
            log_file,
            render: config.render.clone(),
        }
    }

    pub fn renderer(&self) -> MarkdownRenderer {
        let render = &self.render;
        let wikilinks = render.wikilinks.then(|| WikiLinkOptions {
            base_url: render.wikilink_base_url.clone(),
            whitespace: non_empty(&render.wikilink_whitespace).map(str::to_string),
            encode: render.wikilink_encode,
        });
        MarkdownRenderer::new(MarkdownOptions { wikilinks })
    }
}

/// Config file contents, plus any problem that made us fall back to defaults.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: PeekConfig,
    pub warning: Option<PeekError>,
}

/// Load the config file. A file named with `--config` must load; a broken
/// default file falls back to defaults with a warning.
pub fn load_config(args: &Args) -> peek_common::Result<LoadedConfig> {
    match peek_config::load_config(args.config.as_deref()) {
        Ok(config) => Ok(LoadedConfig {
            config,
            warning: None,
        }),
        Err(e) if args.config.is_some() => Err(e.into()),
        Err(e) => Ok(LoadedConfig {
            config: PeekConfig::default(),
            warning: Some(e.into()),
        }),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
