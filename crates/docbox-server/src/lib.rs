//! HTTP server for the Docbox documentation site.
//!
//! Serves fully composed HTML pages over axum:
//! - `/` and `/{path}` render pages through the resolver and shell
//! - `/search-index.json` serves the client-side search index
//! - `/assets/style.css` serves the bundled stylesheet
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docbox_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 3000,
//!         source_dir: PathBuf::from("docs"),
//!         ..Default::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (docbox-server)
//!                        │
//!                        ├─► Page routes ──► Site (resolve + render)
//!                        │                     │
//!                        │                     └─► PageRenderer ─► Shell
//!                        │
//!                        ├─► /search-index.json ──► SearchIndex
//!                        │
//!                        └─► /assets/style.css (embedded)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use docbox_shell::{Shell, ShellConfig, SidebarConfig, TocConfig};
use docbox_site::{PageRenderer, SearchOptions, Site, SiteOptions, WrapperConfig};
use docbox_storage::FsStorage;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Documentation source directory.
    pub source_dir: PathBuf,
    /// Shell chrome configuration.
    pub shell: ShellConfig,
    /// Rendering options.
    pub options: SiteOptions,
    /// Search index options.
    pub search: SearchOptions,
    /// Application version (for ETag computation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
            source_dir: PathBuf::from("docs"),
            shell: ShellConfig::default(),
            options: SiteOptions::default(),
            search: SearchOptions::default(),
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Arc::new(FsStorage::new(config.source_dir.clone()));
    let site = Arc::new(Site::new(storage, config.options.clone()));

    let state = Arc::new(build_state(site, &config));
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Assemble shared application state from a site and configuration.
fn build_state(site: Arc<Site>, config: &ServerConfig) -> AppState {
    let shell = Shell::new(&config.shell, &site.navigation());

    // The floating table of contents lives in the wrapper layout; without it
    // pages pass through unwrapped
    let wrapper = config.shell.toc.float.then(|| WrapperConfig {
        toc_title: config.shell.toc.title.clone(),
    });

    AppState {
        site,
        shell,
        page_renderer: PageRenderer::new(wrapper),
        search: config.search.clone(),
        version: config.version.clone(),
    }
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded Docbox config.
#[must_use]
pub fn server_config_from_config(config: &docbox_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        shell: shell_config_from_config(config),
        options: SiteOptions {
            latex: config.build_resolved.latex,
            copy_code: config.build_resolved.copy_code,
        },
        search: SearchOptions {
            codeblocks: config.search.codeblocks,
        },
        version,
    }
}

/// Map config file sections onto the shell configuration.
#[must_use]
pub fn shell_config_from_config(config: &docbox_config::Config) -> ShellConfig {
    ShellConfig {
        title: config.site.title.clone(),
        description: config.site.description.clone(),
        logo: config.site.logo.clone(),
        favicon_glyph: config.site.favicon_glyph.clone(),
        language: config.site.language.clone(),
        direction: config.site.direction.clone(),
        footer: config.site.footer.clone(),
        sidebar: SidebarConfig {
            default_collapse_level: config.sidebar.default_collapse_level,
            auto_collapse: config.sidebar.auto_collapse,
            toggle_button: config.sidebar.toggle_button,
        },
        toc: TocConfig {
            title: config.toc.title.clone(),
            back_to_top: config.toc.back_to_top.clone(),
            float: config.toc.float,
        },
    }
}
