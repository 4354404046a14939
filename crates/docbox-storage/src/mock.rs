//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::{Document, Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Stores documents and content in memory, keyed by URL path. Use the
/// builder methods to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use docbox_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("guide", "User Guide", "# User Guide\n\nContent.");
///
/// let docs = storage.scan().unwrap();
/// let content = storage.read("guide").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    documents: RwLock<Vec<Document>>,
    contents: RwLock<HashMap<String, String>>,
    mtimes: RwLock<HashMap<String, f64>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with both title and content at a URL path.
    ///
    /// The modification time defaults to the Unix epoch; override it with
    /// [`MockStorage::with_mtime`].
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(
        self,
        path: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let path: String = path.into();
        self.documents.write().unwrap().push(Document {
            path: path.clone(),
            title: title.into(),
            description: None,
        });
        self.mtimes.write().unwrap().insert(path.clone(), 0.0);
        self.contents.write().unwrap().insert(path, content.into());
        self
    }

    /// Set a description on the most recently added document.
    ///
    /// # Panics
    ///
    /// Panics if no document has been added, or the internal lock is poisoned.
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.documents
            .write()
            .unwrap()
            .last_mut()
            .expect("with_description requires a prior with_file")
            .description = Some(description.into());
        self
    }

    /// Set modification time for a URL path, as seconds since Unix epoch.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<String>, mtime: f64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        Ok(self.documents.read().unwrap().clone())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.contents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound)
                    .with_path(path)
                    .with_backend("Mock")
            })
    }

    fn exists(&self, path: &str) -> bool {
        self.contents.read().unwrap().contains_key(path)
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        self.mtimes
            .read()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound)
                    .with_path(path)
                    .with_backend("Mock")
            })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_storage_is_send_sync() {
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_new_empty() {
        let storage = MockStorage::new();
        let docs = storage.scan().unwrap();

        assert!(docs.is_empty());
    }

    #[test]
    fn test_with_file() {
        let storage = MockStorage::new()
            .with_file("", "Home", "# Home")
            .with_file("guide", "User Guide", "# User Guide\n\nContent.");

        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].path, "");
        assert_eq!(docs[0].title, "Home");
        assert_eq!(docs[1].path, "guide");
        assert_eq!(docs[1].title, "User Guide");
        assert_eq!(storage.read("guide").unwrap(), "# User Guide\n\nContent.");
    }

    #[test]
    fn test_with_description() {
        let storage = MockStorage::new()
            .with_file("guide", "Guide", "# Guide")
            .with_description("A helpful guide");

        let docs = storage.scan().unwrap();

        assert_eq!(docs[0].description, Some("A helpful guide".to_string()));
    }

    #[test]
    fn test_read_missing() {
        let storage = MockStorage::new();

        let result = storage.read("missing");

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
        assert_eq!(err.path.as_deref(), Some(Path::new("missing")));
    }

    #[test]
    fn test_exists() {
        let storage = MockStorage::new().with_file("guide", "Guide", "content");

        assert!(storage.exists("guide"));
        assert!(!storage.exists("missing"));
    }

    #[test]
    fn test_with_mtime() {
        let storage = MockStorage::new().with_mtime("guide", 1_234_567_890.0);

        let mtime = storage.mtime("guide").unwrap();

        assert!((mtime - 1_234_567_890.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mtime_missing() {
        let storage = MockStorage::new();

        let result = storage.mtime("missing");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::NotFound);
    }
}
