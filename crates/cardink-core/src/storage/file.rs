//! File-based storage: one JSON document per file.

use super::{Storage, StorageError, StorageResult};
use crate::document::Document;
use std::fs;
use std::path::PathBuf;

/// Stores documents as JSON files in a base directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StorageError::Io(format!("create storage directory: {e}")))?;
        }
        Ok(Self { base_path })
    }

    /// File storage in the platform data directory
    /// (e.g. `~/.local/share/cardink/documents`).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("no data directory available".to_string()))?;
        Self::new(base.join("cardink").join("documents"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn document_path(&self, id: &str) -> PathBuf {
        // Keys become file names; anything unsafe maps to '_'.
        let safe_id: String = id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &Document) -> StorageResult<()> {
        let path = self.document_path(id);
        let json = document
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("write {}: {e}", path.display())))
    }

    fn load(&self, id: &str) -> StorageResult<Document> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("read {}: {e}", path.display())))?;
        // Full validation on the way in: a corrupt file is an explicit
        // error, never a half-loaded document.
        Document::import(&json)
            .map_err(|e| StorageError::Serialization(format!("parse {}: {e}", path.display())))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.document_path(id);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| StorageError::Io(format!("delete {}: {e}", path.display())))?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("read directory: {e}")))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.document_path(id).exists())
    }
}
