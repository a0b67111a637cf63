//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::document::Document;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &Document) -> StorageResult<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))?;
        docs.insert(id.to_string(), document.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<Document> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))?;
        docs.get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut docs = self
            .documents
            .write()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))?;
        docs.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))?;
        Ok(docs.keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let docs = self
            .documents
            .read()
            .map_err(|e| StorageError::Other(format!("lock poisoned: {e}")))?;
        Ok(docs.contains_key(id))
    }
}
