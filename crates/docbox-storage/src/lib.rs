//! Content tree abstraction for the docbox documentation engine.
//!
//! This crate provides a [`Storage`] trait for abstracting document scanning
//! and content retrieval from the underlying backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** beyond a local directory
//! - **Clean separation** between site structure logic and I/O
//!
//! # URL Path Convention
//!
//! All path parameters are **URL paths**, not file paths:
//! - `""` - root (home page)
//! - `"guide"` - standalone page
//! - `"guide/intro"` - nested page
//!
//! Backends map URL paths to their internal storage format.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docbox_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! for doc in storage.scan()? {
//!     println!("{}: {}", doc.path, doc.title);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Document, Storage, StorageError, StorageErrorKind};
