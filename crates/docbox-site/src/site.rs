//! Unified site loading and page rendering.
//!
//! Provides [`Site`] for building [`SiteState`] structures from a [`Storage`]
//! backend, with integrated page rendering.
//!
//! # Architecture
//!
//! The [`Site`] combines site structure loading and route resolution:
//! - Every document scanned from storage becomes a page at its URL path
//! - Parent/child relationships follow the URL path hierarchy
//! - Intermediate paths without a page promote children to the nearest ancestor
//!
//! # Thread Safety
//!
//! `Site` is designed for concurrent access:
//! - `state()` returns `Arc<SiteState>` with minimal locking (just Arc clone)
//! - `reload_if_needed()` uses double-checked locking for efficient revalidation
//! - `invalidate()` is lock-free (atomic flag)

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use docbox_render::{MarkdownRenderer, TocEntry};
use docbox_storage::{Storage, StorageError, StorageErrorKind};
use serde::Serialize;

use crate::front_matter::{self, FrontMatter};
use crate::search::{SearchIndex, SearchOptions};
use crate::site_state::{NavItem, Page, SiteState, SiteStateBuilder};

/// Rendering options applied to every page.
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// Render `$...$` and `$$...$$` segments as math spans.
    pub latex: bool,
    /// Attach a copy button to fenced code blocks.
    pub copy_code: bool,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            latex: true,
            copy_code: true,
        }
    }
}

/// Values a page makes available to its wrapper layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageExports {
    /// Resolved page title.
    pub title: String,
    /// Table of contents entries for headings H2 through H6.
    pub toc: Vec<TocEntry>,
}

/// A fully resolved and rendered page.
#[derive(Clone, Debug)]
pub struct ContentUnit {
    /// URL path without leading slash ("" for root).
    pub path: String,
    /// Front matter parsed from the source document.
    pub metadata: FrontMatter,
    /// Rendered HTML body.
    pub html: String,
    /// Values exposed to the wrapper layout.
    pub exports: PageExports,
    /// Source file modification time (Unix timestamp).
    pub source_mtime: f64,
}

/// Error returned when route resolution fails.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No page exists at the requested path.
    #[error("Page not found: {0}")]
    NotFound(String),
    /// I/O error reading the source document.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<StorageError> for ResolveError {
    fn from(e: StorageError) -> Self {
        match e.kind {
            StorageErrorKind::NotFound => Self::NotFound(
                e.path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => Self::Io(std::io::Error::other(e.to_string())),
        }
    }
}

/// Unified site structure and page rendering.
///
/// Combines site structure loading from a [`Storage`] implementation with
/// markdown rendering. Route resolution is driven entirely by the scanned
/// structure, so a path resolves only when storage produced a page for it.
///
/// # Thread Safety
///
/// This struct is designed for concurrent access without external locking:
/// - Uses internal `RwLock<Arc<SiteState>>` for the current state snapshot
/// - Uses `Mutex<()>` for serializing reload operations
/// - Uses `AtomicBool` for state validity tracking
pub struct Site {
    storage: Arc<dyn Storage>,
    options: SiteOptions,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current site state snapshot (atomically swappable).
    current_state: RwLock<Arc<SiteState>>,
    /// State validity flag.
    state_valid: AtomicBool,
}

impl Site {
    /// Create a new site over a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, options: SiteOptions) -> Self {
        let initial_state = Arc::new(SiteStateBuilder::new().build());

        Self {
            storage,
            options,
            reload_lock: Mutex::new(()),
            current_state: RwLock::new(initial_state),
            state_valid: AtomicBool::new(false),
        }
    }

    /// Get the current site state snapshot.
    ///
    /// Returns an `Arc<SiteState>` that can be used without holding any lock.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    fn state(&self) -> Arc<SiteState> {
        self.current_state.read().unwrap().clone()
    }

    /// Reload the site state from storage if the snapshot is invalid.
    ///
    /// Uses double-checked locking:
    /// 1. Fast path: return current state if valid
    /// 2. Slow path: acquire `reload_lock`, recheck, then rescan storage
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload_if_needed(&self) -> Arc<SiteState> {
        // Fast path: state valid
        if self.state_valid.load(Ordering::Acquire) {
            return self.state();
        }

        // Slow path: acquire reload lock
        let _guard = self.reload_lock.lock().unwrap();

        // Double-check after acquiring lock
        if self.state_valid.load(Ordering::Acquire) {
            return self.state();
        }

        let state = Arc::new(self.load_from_storage());

        *self.current_state.write().unwrap() = state.clone();
        self.state_valid.store(true, Ordering::Release);

        state
    }

    /// Invalidate the cached site state.
    ///
    /// Marks the snapshot as stale. The next `reload_if_needed()` rescans
    /// storage. Current readers continue using their existing `Arc<SiteState>`.
    pub fn invalidate(&self) {
        self.state_valid.store(false, Ordering::Release);
    }

    /// Get the full navigation tree.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        self.reload_if_needed().navigation()
    }

    /// Get page by URL path.
    ///
    /// # Arguments
    ///
    /// * `path` - URL path without leading slash (e.g., "guide", "" for root)
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn get_page(&self, path: &str) -> Option<Page> {
        self.reload_if_needed().get_page(path).cloned()
    }

    /// All resolvable URL paths, sorted.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn static_paths(&self) -> Vec<String> {
        self.reload_if_needed().static_paths()
    }

    /// Resolve a URL path to a rendered page.
    ///
    /// # Arguments
    ///
    /// * `path` - URL path without leading slash (e.g., "guide", "" for root)
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if no page exists at the path.
    /// Returns [`ResolveError::Io`] if the source document cannot be read.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn resolve(&self, path: &str) -> Result<ContentUnit, ResolveError> {
        let state = self.reload_if_needed();

        let page = state
            .get_page(path)
            .ok_or_else(|| ResolveError::NotFound(path.to_owned()))?;

        let raw = self.storage.read(path)?;
        let source_mtime = self.storage.mtime(path)?;

        let (metadata, body) = front_matter::parse(&raw);

        let mut renderer = MarkdownRenderer::new()
            .with_title_extraction()
            .with_base_path(path)
            .with_math(self.options.latex)
            .with_copy_code(self.options.copy_code);
        let result = renderer.render_markdown(body);

        // Front matter wins over H1 extraction, structure title is the fallback
        let title = metadata
            .title
            .clone()
            .or(result.title)
            .unwrap_or_else(|| page.title.clone());

        Ok(ContentUnit {
            path: path.to_owned(),
            metadata,
            html: result.html,
            exports: PageExports {
                title,
                toc: result.toc,
            },
            source_mtime,
        })
    }

    /// Build the search index for the current site.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    #[must_use]
    pub fn search_index(&self, options: &SearchOptions) -> SearchIndex {
        let state = self.reload_if_needed();
        SearchIndex::build(self.storage.as_ref(), &state, options)
    }

    /// Build a fresh site state by scanning storage.
    fn load_from_storage(&self) -> SiteState {
        let mut builder = SiteStateBuilder::new();

        let mut documents = match self.storage.scan() {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to scan storage");
                return builder.build();
            }
        };

        if documents.is_empty() {
            return builder.build();
        }

        // Sort by depth, then path, so parents exist before their children
        documents.sort_by(|a, b| {
            path_depth(&a.path)
                .cmp(&path_depth(&b.path))
                .then_with(|| a.path.cmp(&b.path))
        });

        let mut url_to_idx: HashMap<String, usize> = HashMap::new();

        for doc in &documents {
            let parent_idx = find_parent_from_url(&doc.path, &url_to_idx);
            let idx = builder.add_page(
                doc.title.clone(),
                doc.path.clone(),
                doc.description.clone(),
                parent_idx,
            );
            url_to_idx.insert(doc.path.clone(), idx);
        }

        tracing::debug!(document_count = documents.len(), "Site scan completed");

        builder.build()
    }
}

/// Depth of a URL path ("" is 0, "guide" is 1, "guide/setup" is 2).
fn path_depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches('/').count() + 1
    }
}

/// Find the parent page index for a URL path.
///
/// Walks up the path segments until an existing page is found. Paths whose
/// parent has no page attach to the nearest ancestor, falling back to the
/// root page when one exists.
fn find_parent_from_url(path: &str, url_to_idx: &HashMap<String, usize>) -> Option<usize> {
    if path.is_empty() {
        return None;
    }

    let mut current = path;
    while let Some((parent, _)) = current.rsplit_once('/') {
        if let Some(&idx) = url_to_idx.get(parent) {
            return Some(idx);
        }
        current = parent;
    }

    url_to_idx.get("").copied()
}

#[cfg(test)]
mod tests {
    // Ensure Site is Send + Sync for use with Arc
    static_assertions::assert_impl_all!(super::Site: Send, Sync);

    use std::fs;
    use std::sync::Arc;

    use docbox_storage::{FsStorage, MockStorage};
    use pretty_assertions::assert_eq;

    use super::*;

    fn mock_site() -> Site {
        let storage = MockStorage::new()
            .with_file("", "Home", "# Home\n\nWelcome.\n")
            .with_file(
                "guide",
                "Guide",
                "---\ndescription: Getting started\n---\n\n# Guide\n\n## Install\n\nRun it.\n",
            )
            .with_file("guide/setup", "Setup", "# Setup\n\nSteps.\n");

        Site::new(Arc::new(storage), SiteOptions::default())
    }

    #[test]
    fn test_resolve_renders_html_and_exports() {
        let site = mock_site();

        let unit = site.resolve("guide").unwrap();
        assert_eq!(unit.path, "guide");
        assert_eq!(unit.exports.title, "Guide");
        assert_eq!(unit.metadata.description.as_deref(), Some("Getting started"));
        assert!(unit.html.contains("<h2 id=\"install\">Install</h2>"));
        assert_eq!(unit.exports.toc.len(), 1);
        assert_eq!(unit.exports.toc[0].id, "install");
    }

    #[test]
    fn test_resolve_root() {
        let site = mock_site();

        let unit = site.resolve("").unwrap();
        assert_eq!(unit.exports.title, "Home");
        assert!(unit.html.contains("Welcome."));
    }

    #[test]
    fn test_resolve_unknown_path_not_found() {
        let site = mock_site();

        let err = site.resolve("missing/page").unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(p) if p == "missing/page"));
    }

    #[test]
    fn test_front_matter_title_beats_h1() {
        let storage = MockStorage::new().with_file(
            "page",
            "Page",
            "---\ntitle: Override\n---\n\n# Ignored Heading\n",
        );
        let site = Site::new(Arc::new(storage), SiteOptions::default());

        let unit = site.resolve("page").unwrap();
        assert_eq!(unit.exports.title, "Override");
    }

    #[test]
    fn test_h1_never_appears_in_toc() {
        let storage =
            MockStorage::new().with_file("page", "Page", "# Top\n\n## Section\n\n### Nested\n");
        let site = Site::new(Arc::new(storage), SiteOptions::default());

        let unit = site.resolve("page").unwrap();
        let ids: Vec<&str> = unit.exports.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["section", "nested"]);
    }

    #[test]
    fn test_math_rendering_follows_latex_option() {
        let storage = MockStorage::new()
            .with_file("math", "Math", "Euler: $e^{i\\pi} + 1 = 0$\n");
        let site = Site::new(Arc::new(storage), SiteOptions::default());
        let unit = site.resolve("math").unwrap();
        assert!(unit.html.contains("math-inline"));

        let storage = MockStorage::new()
            .with_file("math", "Math", "Euler: $e^{i\\pi} + 1 = 0$\n");
        let site = Site::new(
            Arc::new(storage),
            SiteOptions {
                latex: false,
                copy_code: true,
            },
        );
        let unit = site.resolve("math").unwrap();
        assert!(!unit.html.contains("math-inline"));
    }

    #[test]
    fn test_copy_code_button_follows_option() {
        let content = "```rust\nfn main() {}\n```\n";

        let storage = MockStorage::new().with_file("code", "Code", content);
        let site = Site::new(Arc::new(storage), SiteOptions::default());
        assert!(site.resolve("code").unwrap().html.contains("copy-code"));

        let storage = MockStorage::new().with_file("code", "Code", content);
        let site = Site::new(
            Arc::new(storage),
            SiteOptions {
                latex: true,
                copy_code: false,
            },
        );
        assert!(!site.resolve("code").unwrap().html.contains("copy-code"));
    }

    #[test]
    fn test_navigation_tree() {
        let site = mock_site();

        let nav = site.navigation();
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].path, "guide");
        assert_eq!(nav[0].children.len(), 1);
        assert_eq!(nav[0].children[0].path, "guide/setup");
    }

    #[test]
    fn test_orphan_attaches_to_nearest_ancestor() {
        let storage = MockStorage::new()
            .with_file("", "Home", "# Home\n")
            .with_file("a/b/c", "Deep", "# Deep\n");
        let site = Site::new(Arc::new(storage), SiteOptions::default());

        // No page at "a" or "a/b", so "a/b/c" attaches to the root
        let nav = site.navigation();
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].path, "a/b/c");
    }

    #[test]
    fn test_state_snapshot_is_cached() {
        let site = mock_site();

        let first = site.reload_if_needed();
        let second = site.reload_if_needed();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_forces_rescan() {
        let site = mock_site();

        let first = site.reload_if_needed();
        site.invalidate();
        let second = site.reload_if_needed();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.page_count(), first.page_count());
    }

    #[test]
    fn test_concurrent_resolution() {
        let site = Arc::new(mock_site());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let site = Arc::clone(&site);
                std::thread::spawn(move || {
                    let unit = site.resolve("guide/setup").unwrap();
                    assert_eq!(unit.exports.title, "Setup");
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_scan_failure_yields_empty_state() {
        struct FailingStorage;

        impl docbox_storage::Storage for FailingStorage {
            fn scan(&self) -> Result<Vec<docbox_storage::Document>, StorageError> {
                Err(StorageError::new(StorageErrorKind::Other))
            }
            fn read(&self, path: &str) -> Result<String, StorageError> {
                Err(StorageError::not_found(path))
            }
            fn exists(&self, _path: &str) -> bool {
                false
            }
            fn mtime(&self, path: &str) -> Result<f64, StorageError> {
                Err(StorageError::not_found(path))
            }
        }

        let site = Site::new(Arc::new(FailingStorage), SiteOptions::default());
        let state = site.reload_if_needed();
        assert_eq!(state.page_count(), 0);
    }

    #[test]
    fn test_fs_storage_end_to_end() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("index.md"), "# Docs Home\n").unwrap();
        fs::create_dir(root.join("guide")).unwrap();
        fs::write(root.join("guide").join("index.md"), "# Guide\n").unwrap();
        fs::write(
            root.join("guide").join("setup.md"),
            "# Setup\n\n## Requirements\n",
        )
        .unwrap();

        let storage = Arc::new(FsStorage::new(root.to_path_buf()));
        let site = Site::new(storage, SiteOptions::default());

        assert_eq!(
            site.static_paths(),
            vec![String::new(), "guide".to_owned(), "guide/setup".to_owned()]
        );

        let unit = site.resolve("guide/setup").unwrap();
        assert_eq!(unit.exports.title, "Setup");
        assert!(unit.html.contains("id=\"requirements\""));
        assert!(unit.source_mtime > 0.0);
    }
}
