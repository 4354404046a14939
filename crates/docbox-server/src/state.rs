//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use docbox_shell::Shell;
use docbox_site::{PageRenderer, SearchOptions, Site};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Site resolver and renderer.
    pub(crate) site: Arc<Site>,
    /// Precomposed page chrome.
    pub(crate) shell: Shell,
    /// Content wrapper renderer.
    pub(crate) page_renderer: PageRenderer,
    /// Search index options.
    pub(crate) search: SearchOptions,
    /// Application version for ETag computation.
    pub(crate) version: String,
}
