//! The card document: a fixed-size canvas plus its ordered layers.

use crate::layers::{Background, Layer, LayerId};
use chrono::{DateTime, Utc};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced when accepting a document from the outside world.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no layers; a background layer is required")]
    Empty,
    #[error("layer 0 must be the background layer")]
    MissingBackground,
    #[error("duplicate layer id: {0}")]
    DuplicateLayerId(LayerId),
    #[error("selected layer {0} does not exist")]
    DanglingSelection(LayerId),
    #[error("layer {id} has opacity {opacity} outside [0, 1]")]
    OpacityOutOfRange { id: LayerId, opacity: f64 },
}

/// A card document. Layers are stored back-to-front; index 0 is always the
/// background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Fixed canvas size in pixels.
    pub canvas_size: Size,
    /// Layers in z-order (back to front).
    pub layers: Vec<Layer>,
    /// Currently selected layer, if any.
    #[serde(default)]
    pub selected_id: Option<LayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Default canvas: a 3.5" x 2" card at 300 dpi.
    pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1050.0, 600.0);

    /// Create a new document with a default background layer.
    pub fn new(name: impl Into<String>, canvas_size: Size) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            canvas_size,
            layers: vec![Layer::Background(Background::default())],
            selected_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Find a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Find a layer by id, mutably.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    /// Z-order index of a layer.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Number of layers, background included.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Refresh `updated_at`.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check the structural invariants: background at index 0 (locked),
    /// unique ids, live selection, opacities in range.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let first = self.layers.first().ok_or(DocumentError::Empty)?;
        if !first.is_background() || !first.locked() {
            return Err(DocumentError::MissingBackground);
        }

        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(layer.id()) {
                return Err(DocumentError::DuplicateLayerId(layer.id()));
            }
            let opacity = layer.opacity();
            if !(0.0..=1.0).contains(&opacity) {
                return Err(DocumentError::OpacityOutOfRange {
                    id: layer.id(),
                    opacity,
                });
            }
        }

        if let Some(selected) = self.selected_id {
            if !seen.contains(&selected) {
                return Err(DocumentError::DanglingSelection(selected));
            }
        }
        Ok(())
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON without structural validation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse and validate a document coming from the outside (file import,
    /// autosave restore). Malformed input is an explicit error; nothing is
    /// mutated on failure.
    pub fn import(json: &str) -> Result<Self, DocumentError> {
        let document = Self::from_json(json)?;
        document.validate()?;
        Ok(document)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled", Self::DEFAULT_CANVAS_SIZE)
    }
}
