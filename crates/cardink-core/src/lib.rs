//! CardInk Core Library
//!
//! Document model and editing engine for the CardInk card composer:
//! the layer data model, the mutating document store with bounded
//! undo/redo, snapping and alignment guides for interactive placement,
//! and JSON persistence with auto-save. Rendering, property panels, and
//! export live in other crates and talk to this one through
//! [`DocumentStore`] and the [`storage::Storage`] trait.

pub mod document;
pub mod history;
pub mod layers;
pub mod snap;
pub mod storage;
pub mod store;

pub use document::{Document, DocumentError};
pub use history::{History, Snapshot, DEFAULT_HISTORY_CAPACITY};
pub use layers::{Layer, LayerId, LayerKind, LayerPatch, SerializableColor};
pub use snap::{
    alignment_guides, snap_position, AlignmentGuide, Axis, GuideKind, SnapContext, SnapResult,
    GRID_SIZE, SNAP_THRESHOLD,
};
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, Storage, StorageError};
pub use store::DocumentStore;
