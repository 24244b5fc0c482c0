//! Native window hosting the preview WebView.
//!
//! Implements `winit::application::ApplicationHandler`: one window, one
//! WebView filling it, and the event loop exits when the window closes.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use peek_common::PeekError;
use tracing::{debug, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes, WindowId};
use wry::http::{header, Response};
use wry::{WebView, WebViewBuilder};

use crate::client::{self, ClientConfig};
use crate::content::{request_path, ContentProvider, INDEX_URL, SCHEME};
use crate::page::{build_page, PageOptions};
use crate::settings::WindowSettings;

/// Allowed URL prefixes for navigation inside the preview.
///
/// On Windows, WebView2 rewrites `peek://localhost/...` to
/// `http://peek.localhost/...`.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &["peek://", "http://peek.localhost", "about:blank"];

pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

pub struct PreviewApp {
    settings: WindowSettings,
    content: Arc<ContentProvider>,
    window: Option<Window>,
    webview: Option<WebView>,
    error: Option<PeekError>,
}

impl PreviewApp {
    pub fn new(settings: WindowSettings, cache_dir: Option<PathBuf>) -> Self {
        let mut content = ContentProvider::new(cache_dir);
        let page = PageOptions {
            title: settings.title.clone(),
            debug: settings.debug,
            ..Default::default()
        }
        .with_available_stylesheets(&content);

        content.add("index.html", build_page(&page));
        content.add("script.js", client::SCRIPT);
        content.add("style.css", client::STYLE);

        Self {
            settings,
            content: Arc::new(content),
            window: None,
            webview: None,
            error: None,
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<PeekError> {
        self.error.take()
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> peek_common::Result<()> {
        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(900.0, 1000.0));
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PeekError::Window(format!("failed to create window: {e}")))?;

        let config = ClientConfig {
            theme: self.settings.theme,
            server_url: self.settings.server_url.clone(),
            debug: self.settings.debug,
        };
        let content = Arc::clone(&self.content);

        let webview = WebViewBuilder::new()
            .with_bounds(full_bounds(&window))
            .with_devtools(self.settings.debug)
            .with_initialization_script(&config.init_script())
            .with_custom_protocol(SCHEME.to_string(), move |_wv_id, request| {
                serve(&content, &request.uri().to_string())
            })
            .with_navigation_handler(|url| {
                let allowed = is_navigation_allowed(&url);
                if !allowed {
                    warn!(url = %url, "navigation blocked");
                }
                allowed
            })
            .with_url(INDEX_URL)
            .build_as_child(&window)
            .map_err(|e| PeekError::Window(format!("failed to create webview: {e}")))?;

        debug!(server = %self.settings.server_url, "preview window open");
        self.window = Some(window);
        self.webview = Some(webview);
        Ok(())
    }

    fn sync_bounds(&self) {
        if let (Some(window), Some(webview)) = (&self.window, &self.webview) {
            if let Err(e) = webview.set_bounds(full_bounds(window)) {
                warn!(error = %e, "failed to resize webview");
            }
        }
    }
}

impl ApplicationHandler for PreviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            tracing::error!("{e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.webview = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                self.sync_bounds();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // WebKitGTK runs on the GTK main loop, which winit does not drive.
        #[cfg(target_os = "linux")]
        while gtk::events_pending() {
            gtk::main_iteration_do(false);
        }
    }
}

fn full_bounds(window: &Window) -> wry::Rect {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(size.width, size.height)),
    }
}

/// Answer one `peek://` request.
pub fn serve(content: &ContentProvider, uri: &str) -> Response<Cow<'static, [u8]>> {
    let path = request_path(uri);
    match content.resolve(path) {
        Some((mime, data)) => Response::builder()
            .status(200)
            .header(header::CONTENT_TYPE, mime)
            .body(Cow::Owned(data.into_owned()))
            .unwrap_or_else(|_| status_only(500)),
        None => {
            warn!(path = %path, "custom protocol: asset not found");
            status_only(404)
        }
    }
}

fn status_only(status: u16) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Borrowed(&[][..]));
    if let Ok(code) = wry::http::StatusCode::from_u16(status) {
        *response.status_mut() = code;
    }
    response
}
