//! Filesystem storage backend.
//!
//! Scans a source directory recursively for `.md` and `.mdx` files, mapping
//! them to URL paths. Titles come from front matter, then the first H1
//! heading, then the titlecased filename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::Deserialize;

use crate::storage::{Document, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Content file extensions, in candidate resolution order.
const EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Front matter fields the scanner cares about. Remaining fields are left
/// for the rendering layer.
#[derive(Debug, Default, Deserialize)]
struct ScanFrontMatter {
    title: Option<String>,
    description: Option<String>,
}

/// Split document source into front matter block and body.
///
/// The block must start on the first line with `---` and end with a matching
/// `---` line. Returns `(None, content)` when no block is present.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, content);
    };
    match rest.find("\n---") {
        Some(end) => {
            let body = rest[end + 4..].trim_start_matches(['\r', '\n']);
            (Some(&rest[..end]), body)
        }
        None => (None, content),
    }
}

/// Parse the front matter fields used for scanning.
fn scan_front_matter(content: &str) -> ScanFrontMatter {
    let (block, _) = split_front_matter(content);
    block
        .and_then(|b| serde_yaml::from_str(b).ok())
        .unwrap_or_default()
}

/// Extract the first H1 heading from markdown source, skipping front matter.
fn first_h1(content: &str) -> Option<String> {
    let (_, body) = split_front_matter(content);
    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence
            && let Some(rest) = line.strip_prefix("# ")
        {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Check whether a filename has a recognized content extension.
fn is_content_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|e| EXTENSIONS.iter().any(|ext| e == *ext))
}

/// Strip the content extension from a filename, returning the stem.
fn strip_content_ext(name: &str) -> &str {
    EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(&format!(".{ext}")[..]))
        .unwrap_or(name)
}

/// Preference rank for a content file, lower wins.
///
/// Matches `resolve_content` order: standalone before directory index,
/// `.md` before `.mdx`.
fn candidate_rank(file_path: &Path) -> usize {
    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let is_index = usize::from(strip_content_ext(&name) == "index");
    let ext_order = file_path
        .extension()
        .and_then(|e| EXTENSIONS.iter().position(|ext| e == *ext))
        .unwrap_or(EXTENSIONS.len());
    is_index * (EXTENSIONS.len() + 1) + ext_order
}

/// Filesystem storage backend.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use docbox_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let documents = storage.scan()?;
/// for doc in documents {
///     println!("{}: {}", doc.path, doc.title);
/// }
/// ```
pub struct FsStorage {
    /// Root directory for document storage.
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Validate that a URL path is relative and free of traversal segments.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let traversal = path.split('/').any(|seg| seg == "..");
        if traversal || path.starts_with('/') {
            return Err(StorageError::invalid_path(path).with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a URL path to its content file.
    ///
    /// Candidates, in order:
    /// 1. `{path}.md` / `{path}.mdx` (standalone file preferred)
    /// 2. `{path}/index.md` / `{path}/index.mdx`
    ///
    /// The root path (`""`) resolves to `index.md` / `index.mdx` directly.
    fn resolve_content(&self, url_path: &str) -> Option<PathBuf> {
        if url_path.is_empty() {
            return EXTENSIONS
                .iter()
                .map(|ext| self.source_dir.join(format!("index.{ext}")))
                .find(|p| p.is_file());
        }

        for ext in EXTENSIONS {
            let standalone = self.source_dir.join(format!("{url_path}.{ext}"));
            if standalone.is_file() {
                return Some(standalone);
            }
        }
        EXTENSIONS
            .iter()
            .map(|ext| self.source_dir.join(url_path).join(format!("index.{ext}")))
            .find(|p| p.is_file())
    }

    /// Walk a directory, collecting url path -> content file mappings.
    ///
    /// Hidden entries and entries starting with `_` are skipped. When several
    /// source files map to the same URL path, the one `resolve_content` would
    /// serve wins and the rest are dropped with a warning.
    fn walk(&self, dir: &Path, url_prefix: &str, files: &mut BTreeMap<String, PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            if is_dir {
                let child_url = if url_prefix.is_empty() {
                    name
                } else {
                    format!("{url_prefix}/{name}")
                };
                self.walk(&path, &child_url, files);
            } else if is_content_file(&name) {
                let stem = strip_content_ext(&name);
                let url_path = if stem == "index" {
                    url_prefix.to_string()
                } else if url_prefix.is_empty() {
                    stem.to_string()
                } else {
                    format!("{url_prefix}/{stem}")
                };

                if let Some(existing) = files.get(&url_path) {
                    let (keep, drop) = if candidate_rank(&path) < candidate_rank(existing) {
                        (path, existing.clone())
                    } else {
                        (existing.clone(), path)
                    };
                    tracing::warn!(
                        path = %url_path,
                        kept = %keep.display(),
                        dropped = %drop.display(),
                        "Multiple source files map to the same route"
                    );
                    files.insert(url_path, keep);
                } else {
                    files.insert(url_path, path);
                }
            }
        }
    }

    /// Build a `Document` from a resolved content file.
    fn build_document(url_path: &str, file_path: &Path) -> Option<Document> {
        let content = fs::read_to_string(file_path).ok()?;
        let front_matter = scan_front_matter(&content);
        let title = front_matter
            .title
            .or_else(|| first_h1(&content))
            .unwrap_or_else(|| Self::derive_title(url_path, file_path));

        Some(Document {
            path: url_path.to_string(),
            title,
            description: front_matter.description,
        })
    }

    /// Generate a title from the URL path or filename stem.
    fn derive_title(url_path: &str, file_path: &Path) -> String {
        if url_path.is_empty() {
            return "Home".to_string();
        }
        file_path
            .file_name()
            .map(|n| titlecase_from_slug(strip_content_ext(&n.to_string_lossy())))
            .unwrap_or_default()
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        let mut files = BTreeMap::new();
        if self.source_dir.exists() {
            self.walk(&self.source_dir, "", &mut files);
        }

        Ok(files
            .iter()
            .filter_map(|(url_path, file_path)| Self::build_document(url_path, file_path))
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self
            .resolve_content(path)
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        Self::validate_path(path).is_ok() && self.resolve_content(path).is_some()
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        Self::validate_path(path)?;
        let full_path = self
            .resolve_content(path)
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))?;
        let modified = fs::metadata(&full_path)
            .and_then(|m| m.modified())
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert!(docs.is_empty());
    }

    #[test]
    fn test_scan_missing_dir() {
        let storage = FsStorage::new(PathBuf::from("/nonexistent"));
        let docs = storage.scan().unwrap();

        assert!(docs.is_empty());
    }

    #[test]
    fn test_scan_flat_structure() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# User Guide\n\nContent.").unwrap();
        fs::write(temp_dir.path().join("api.mdx"), "# API Reference\n\nDocs.").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 2);
        let paths: Vec<_> = docs.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&"api"));
        assert!(paths.contains(&"guide"));
    }

    #[test]
    fn test_scan_nested_structure() {
        let temp_dir = create_test_dir();
        let guide_dir = temp_dir.path().join("guide");
        fs::create_dir(&guide_dir).unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Home").unwrap();
        fs::write(guide_dir.join("index.md"), "# Guide\n\nOverview.").unwrap();
        fs::write(guide_dir.join("setup.md"), "# Setup\n\nSteps.").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 3);
        let paths: Vec<_> = docs.iter().map(|d| d.path.as_str()).collect();
        assert!(paths.contains(&""));
        assert!(paths.contains(&"guide"));
        assert!(paths.contains(&"guide/setup"));
    }

    #[test]
    fn test_scan_title_from_front_matter() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("guide.md"),
            "---\ntitle: Custom Title\ndescription: A guide\n---\n\n# Ignored Heading\n",
        )
        .unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Custom Title");
        assert_eq!(docs[0].description, Some("A guide".to_string()));
    }

    #[test]
    fn test_scan_title_from_h1() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("guide.md"),
            "# My Custom Title\n\nContent.",
        )
        .unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "My Custom Title");
        assert!(docs[0].description.is_none());
    }

    #[test]
    fn test_scan_title_falls_back_to_filename() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("setup-guide.md"),
            "Content without heading.",
        )
        .unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Setup Guide");
    }

    #[test]
    fn test_scan_h1_inside_code_fence_ignored() {
        let temp_dir = create_test_dir();
        fs::write(
            temp_dir.path().join("snippets.md"),
            "```\n# not a heading\n```\n\n# Real Heading\n",
        )
        .unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs[0].title, "Real Heading");
    }

    #[test]
    fn test_scan_skips_hidden_and_underscore_files() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join(".hidden.md"), "# Hidden").unwrap();
        fs::write(temp_dir.path().join("_app.mdx"), "# App").unwrap();
        fs::write(temp_dir.path().join("visible.md"), "# Visible").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "visible");
    }

    #[test]
    fn test_scan_standalone_wins_over_directory_index() {
        let temp_dir = create_test_dir();
        let guide_dir = temp_dir.path().join("guide");
        fs::create_dir(&guide_dir).unwrap();
        fs::write(guide_dir.join("index.md"), "# Index Variant").unwrap();
        fs::write(temp_dir.path().join("guide.md"), "# Standalone Variant").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "guide");
        assert_eq!(docs[0].title, "Standalone Variant");
    }

    #[test]
    fn test_scan_md_wins_over_mdx_for_same_route() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Md Variant").unwrap();
        fs::write(temp_dir.path().join("guide.mdx"), "# Mdx Variant").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        // Scan metadata comes from the same file read() serves
        assert_eq!(docs[0].title, "Md Variant");
        assert_eq!(storage.read("guide").unwrap(), "# Md Variant");
    }

    #[test]
    fn test_read_existing_file() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide\n\nContent here.").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let content = storage.read("guide").unwrap();

        assert_eq!(content, "# Guide\n\nContent here.");
    }

    #[test]
    fn test_read_root() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("index.mdx"), "# Home").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let content = storage.read("").unwrap();

        assert_eq!(content, "# Home");
    }

    #[test]
    fn test_read_nested_file() {
        let temp_dir = create_test_dir();
        let guide_dir = temp_dir.path().join("guide");
        fs::create_dir(&guide_dir).unwrap();
        fs::write(guide_dir.join("index.md"), "# Guide").unwrap();
        fs::write(guide_dir.join("setup.md"), "# Setup").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("guide").unwrap(), "# Guide");
        assert_eq!(storage.read("guide/setup").unwrap(), "# Setup");
    }

    #[test]
    fn test_read_prefers_standalone_file() {
        let temp_dir = create_test_dir();
        let guide_dir = temp_dir.path().join("guide");
        fs::create_dir(&guide_dir).unwrap();
        fs::write(guide_dir.join("index.md"), "# Index Variant").unwrap();
        fs::write(temp_dir.path().join("guide.md"), "# Standalone Variant").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert_eq!(storage.read("guide").unwrap(), "# Standalone Variant");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let result = storage.read("nonexistent");

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_path_traversal() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let result = storage.read("../etc/passwd");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_rejects_absolute_path() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let result = storage.read("/etc/passwd");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_exists() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.exists("guide"));
        assert!(!storage.exists("nonexistent"));
        assert!(!storage.exists("../etc/passwd"));
    }

    #[test]
    fn test_mtime_returns_modification_time() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("guide.md"), "# Guide").unwrap();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let mtime = storage.mtime("guide").unwrap();

        let now = std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs_f64();
        assert!(mtime > now - 60.0);
        assert!(mtime <= now);
    }

    #[test]
    fn test_mtime_missing_file() {
        let temp_dir = create_test_dir();

        let storage = FsStorage::new(temp_dir.path().to_path_buf());
        let result = storage.mtime("nonexistent");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::NotFound);
    }

    #[test]
    fn test_titlecase_from_slug() {
        assert_eq!(titlecase_from_slug("setup-guide"), "Setup Guide");
        assert_eq!(titlecase_from_slug("my_page"), "My Page");
        assert_eq!(titlecase_from_slug("simple"), "Simple");
    }

    #[test]
    fn test_split_front_matter() {
        let (block, body) = split_front_matter("---\ntitle: Hi\n---\nBody");
        assert_eq!(block, Some("title: Hi"));
        assert_eq!(body, "Body");

        let (block, body) = split_front_matter("no front matter");
        assert!(block.is_none());
        assert_eq!(body, "no front matter");

        let (block, _) = split_front_matter("---not closed");
        assert!(block.is_none());
    }
}
