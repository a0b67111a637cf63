//! Storage abstraction for document persistence.
//!
//! Backends are interchangeable behind the [`Storage`] trait. All failures
//! stay at this boundary: a storage error never invalidates the in-memory
//! document.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, LAST_DOCUMENT_KEY};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::Document;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
pub trait Storage: Send + Sync {
    /// Save a document under a key.
    fn save(&self, id: &str, document: &Document) -> StorageResult<()>;

    /// Load a document by key.
    fn load(&self, id: &str) -> StorageResult<Document>;

    /// Delete a document. Deleting a missing key is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all stored document keys.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check whether a key exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
