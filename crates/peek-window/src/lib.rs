//! Preview window for peek.
//!
//! A small native window with a `wry` WebView. The page is served from
//! memory over the `peek://` custom protocol; its script connects back to the
//! server named in the environment and renders what it is sent.

pub mod client;
pub mod content;
pub mod page;
pub mod settings;
pub mod window;

pub use client::ClientConfig;
pub use content::ContentProvider;
pub use settings::WindowSettings;
pub use window::PreviewApp;
