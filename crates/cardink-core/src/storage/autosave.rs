//! Periodic document persistence.
//!
//! The editor marks the manager dirty after edits; a timer calls
//! [`AutoSaveManager::autosave_tick`] and failures never interrupt the
//! editing session.

use super::{Storage, StorageResult};
use crate::document::Document;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key under which the most recently edited document is mirrored, so a new
/// session can pick up where the last one left off.
pub const LAST_DOCUMENT_KEY: &str = "__last_document__";

/// Manages automatic document persistence over a storage backend.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    current_doc_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create an auto-save manager with the default interval.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            current_doc_id: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record that the document has unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_document_id(&mut self, id: Option<String>) {
        self.current_doc_id = id;
    }

    pub fn document_id(&self) -> Option<&str> {
        self.current_doc_id.as_deref()
    }

    /// Whether a save is due: dirty and the interval has elapsed (or no
    /// save has happened yet).
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save if due. Returns whether a save was performed.
    pub fn maybe_save(&mut self, document: &Document) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(document)?;
        Ok(true)
    }

    /// The timer entry point: saves if due, reporting failure as a plain
    /// `false` so a full disk or exceeded quota never interrupts editing.
    pub fn autosave_tick(&mut self, document: &Document) -> bool {
        match self.maybe_save(document) {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("autosave failed: {e}");
                false
            }
        }
    }

    /// Save immediately, also mirroring under [`LAST_DOCUMENT_KEY`].
    pub fn save(&mut self, document: &Document) -> StorageResult<()> {
        let doc_id = self
            .current_doc_id
            .clone()
            .unwrap_or_else(|| document.id.clone());

        self.storage.save(&doc_id, document)?;
        self.storage.save(LAST_DOCUMENT_KEY, document)?;

        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(())
    }

    /// Load a document by key and make it current.
    pub fn load(&mut self, id: &str) -> StorageResult<Document> {
        let document = self.storage.load(id)?;
        self.current_doc_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(document)
    }

    /// Restore the most recently edited document, if one was mirrored.
    pub fn load_last(&mut self) -> Option<Document> {
        match self.storage.load(LAST_DOCUMENT_KEY) {
            Ok(document) => {
                self.current_doc_id = Some(document.id.clone());
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(document)
            }
            Err(_) => None,
        }
    }

    pub fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id)
    }

    /// All saved document keys, with the restore mirror filtered out.
    pub fn list_documents(&self) -> StorageResult<Vec<String>> {
        let mut keys = self.storage.list()?;
        keys.retain(|id| id != LAST_DOCUMENT_KEY);
        Ok(keys)
    }

    pub fn exists(&self, id: &str) -> StorageResult<bool> {
        self.storage.exists(id)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
