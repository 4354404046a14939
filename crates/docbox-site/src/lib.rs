//! Site structure and page rendering for Docbox.
//!
//! This crate provides:
//! - [`Site`]: route resolution and markdown-to-HTML rendering over a storage backend
//! - [`PageRenderer`]: optional wrapper layout around rendered page content
//! - [`SearchIndex`]: client-side search index built from page sources
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use docbox_site::{Site, SiteOptions};
//! use docbox_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let site = Arc::new(Site::new(storage, SiteOptions::default()));
//!
//! // Resolve and render a page
//! let unit = site.resolve("guide")?;
//! println!("{}", unit.html);
//!
//! // Navigation tree for the shell
//! let nav = site.navigation();
//! # Ok(())
//! # }
//! ```

pub(crate) mod front_matter;
pub(crate) mod page;
pub(crate) mod search;
pub(crate) mod site;
pub(crate) mod site_state;

pub use front_matter::FrontMatter;
pub use page::{PageRenderer, WrapperConfig};
pub use search::{SearchEntry, SearchIndex, SearchOptions};
pub use site::{ContentUnit, PageExports, ResolveError, Site, SiteOptions};
pub use site_state::{NavItem, Page, SiteState};

// Re-export TocEntry from docbox-render for convenience
pub use docbox_render::TocEntry;
