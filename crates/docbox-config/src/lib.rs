//! Configuration management for Docbox.
//!
//! Parses `docbox.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! The `server.host` value supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override static build output directory.
    pub out_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docbox.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site presentation configuration.
    pub site: SiteSection,
    /// Server configuration.
    pub server: ServerSection,
    /// Documentation source configuration (paths as strings from TOML).
    docs: DocsSectionRaw,
    /// Sidebar behavior.
    pub sidebar: SidebarSection,
    /// Table of contents presentation.
    pub toc: TocSection,
    /// Rendering and static build configuration (paths as strings from TOML).
    build: BuildSectionRaw,
    /// Search index configuration.
    pub search: SearchSection,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsSection,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildSection,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Document and navbar title.
    pub title: String,
    /// Meta description.
    pub description: Option<String>,
    /// Navbar logo text.
    pub logo: String,
    /// Emoji rendered into an inline SVG favicon.
    pub favicon_glyph: Option<String>,
    /// `lang` attribute for the HTML document.
    pub language: String,
    /// `dir` attribute for the HTML document.
    pub direction: String,
    /// Footer text. `{year}` expands to the current year.
    pub footer: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Dannbox Documentation".to_owned(),
            description: Some(
                "Comprehensive documentation for Dannbox - Build amazing applications with ease"
                    .to_owned(),
            ),
            logo: "Dannbox Docs".to_owned(),
            favicon_glyph: Some("\u{1f4e6}".to_owned()),
            language: "es".to_owned(),
            direction: "ltr".to_owned(),
            footer: "MIT {year} \u{a9} Dannbox.".to_owned(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsSectionRaw {
    source_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsSection {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
}

/// Sidebar behavior configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SidebarSection {
    /// Tree depth up to which menus start expanded.
    pub default_collapse_level: usize,
    /// Collapse sibling menus when one is opened.
    pub auto_collapse: bool,
    /// Show the sidebar hide/show toggle.
    pub toggle_button: bool,
}

impl Default for SidebarSection {
    fn default() -> Self {
        Self {
            default_collapse_level: 1,
            auto_collapse: true,
            toggle_button: true,
        }
    }
}

/// Table of contents presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocSection {
    /// Heading shown above the per-page table of contents.
    pub title: String,
    /// Label for the back-to-top link.
    pub back_to_top: String,
    /// Render the table of contents as a floating panel.
    pub float: bool,
}

impl Default for TocSection {
    fn default() -> Self {
        Self {
            title: "On this page".to_owned(),
            back_to_top: "Scroll to top".to_owned(),
            float: true,
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildSectionRaw {
    latex: Option<bool>,
    copy_code: Option<bool>,
    out_dir: Option<String>,
}

/// Resolved rendering and static build configuration.
#[derive(Debug)]
pub struct BuildSection {
    /// Render `$...$` and `$$...$$` segments as math spans.
    pub latex: bool,
    /// Attach a copy button to fenced code blocks.
    pub copy_code: bool,
    /// Output directory for static builds.
    pub out_dir: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            latex: true,
            copy_code: true,
            out_dir: PathBuf::from("dist"),
        }
    }
}

/// Search index configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Include fenced code block content in the search index.
    pub codeblocks: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self { codeblocks: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DOCBOX_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docbox.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.build_resolved.out_dir.clone_from(out_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteSection::default(),
            server: ServerSection::default(),
            docs: DocsSectionRaw::default(),
            sidebar: SidebarSection::default(),
            toc: TocSection::default(),
            build: BuildSectionRaw::default(),
            search: SearchSection::default(),
            docs_resolved: DocsSection {
                source_dir: base.join("docs"),
            },
            build_resolved: BuildSection {
                out_dir: base.join("dist"),
                ..Default::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.server.host = expand::expand_env(&config.server.host, "server.host")?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.language, "site.language")?;

        if self.site.direction != "ltr" && self.site.direction != "rtl" {
            return Err(ConfigError::Validation(
                "site.direction must be \"ltr\" or \"rtl\"".to_owned(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// A leading `~` in configured paths expands to the home directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| {
            let raw = path.unwrap_or(default);
            let expanded = shellexpand::tilde(raw);
            let expanded = Path::new(expanded.as_ref());
            if expanded.is_absolute() {
                expanded.to_path_buf()
            } else {
                config_dir.join(expanded)
            }
        };

        self.docs_resolved = DocsSection {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
        };

        self.build_resolved = BuildSection {
            latex: self.build.latex.unwrap_or(true),
            copy_code: self.build.copy_code.unwrap_or(true),
            out_dir: resolve(self.build.out_dir.as_deref(), "dist"),
        };
    }
}
