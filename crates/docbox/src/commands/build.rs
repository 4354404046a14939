//! `docbox build` command implementation.
//!
//! Renders every resolvable page through the same pipeline as the server and
//! writes the result as a static site: one `index.html` per page directory,
//! the search index, the stylesheet, and a 404 page.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use docbox_config::{CliSettings, Config};
use docbox_server::shell_config_from_config;
use docbox_shell::{STYLESHEET, Shell};
use docbox_site::{PageRenderer, SearchOptions, Site, SiteOptions, WrapperConfig};
use docbox_storage::FsStorage;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover docbox.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the export cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: None,
            port: None,
            source_dir: self.source_dir,
            out_dir: self.out_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Building site from {}",
            config.docs_resolved.source_dir.display()
        ));

        let page_count = export_site(&config)?;

        output.success(&format!(
            "Exported {page_count} pages to {}",
            config.build_resolved.out_dir.display()
        ));

        Ok(())
    }
}

/// Export the whole site into the configured output directory.
///
/// Returns the number of exported pages.
fn export_site(config: &Config) -> Result<usize, CliError> {
    let storage = Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
    let site = Site::new(
        storage,
        SiteOptions {
            latex: config.build_resolved.latex,
            copy_code: config.build_resolved.copy_code,
        },
    );

    let shell = Shell::new(&shell_config_from_config(config), &site.navigation());
    let wrapper = config.toc.float.then(|| WrapperConfig {
        toc_title: config.toc.title.clone(),
    });
    let page_renderer = PageRenderer::new(wrapper);

    let out_dir = &config.build_resolved.out_dir;
    fs::create_dir_all(out_dir)?;

    let mut page_count = 0;
    for path in site.static_paths() {
        let unit = site
            .resolve(&path)
            .map_err(|e| CliError::Build(format!("Failed to render /{path}: {e}")))?;

        let body = page_renderer.render(&unit);
        let document = shell.compose(
            &unit.exports.title,
            unit.metadata.description.as_deref(),
            &body,
        );

        let target_dir = if path.is_empty() {
            out_dir.clone()
        } else {
            out_dir.join(&path)
        };
        fs::create_dir_all(&target_dir)?;
        fs::write(target_dir.join("index.html"), document)?;

        tracing::info!(path = %path, "Exported page");
        page_count += 1;
    }

    let not_found = shell.compose(
        "404",
        None,
        "<div class=\"not-found\"><h1>404</h1><p>Page not found.</p><p><a href=\"/\">Back to the start page</a></p></div>",
    );
    fs::write(out_dir.join("404.html"), not_found)?;

    let index = site.search_index(&SearchOptions {
        codeblocks: config.search.codeblocks,
    });
    let json = serde_json::to_string(&index)
        .map_err(|e| CliError::Build(format!("Failed to serialize search index: {e}")))?;
    fs::write(out_dir.join("search-index.json"), json)?;

    let assets_dir = out_dir.join("assets");
    fs::create_dir_all(&assets_dir)?;
    fs::write(assets_dir.join("style.css"), STYLESHEET)?;

    Ok(page_count)
}
