//! Bounded undo/redo history over document snapshots.

use crate::layers::{Layer, LayerId};
use serde::{Deserialize, Serialize};

/// Maximum number of snapshots kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// An immutable capture of the undoable document state.
///
/// Selection is part of the snapshot so undo puts the user back where they
/// were; metadata like `updated_at` is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layers: Vec<Layer>,
    pub selected_id: Option<LayerId>,
}

impl Snapshot {
    pub fn new(layers: Vec<Layer>, selected_id: Option<LayerId>) -> Self {
        Self {
            layers,
            selected_id,
        }
    }
}

/// A bounded, cursor-indexed snapshot list.
///
/// The entry at the cursor always equals the live document state, so the
/// list is seeded with an initial snapshot at creation and after every
/// document load. Capturing while the cursor sits behind the end discards
/// the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Create a history seeded with the initial state.
    pub fn new(initial: Snapshot) -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY, initial)
    }

    /// Create a history with a custom capacity (minimum 1).
    pub fn with_capacity(capacity: usize, initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record the state after a mutating edit.
    pub fn capture(&mut self, snapshot: Snapshot) {
        // Drop the redo branch, then append.
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        // Evict the oldest entry when over capacity; the cursor math below
        // stays valid because eviction shifts every index down by one.
        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one entry. Returns the snapshot to restore, or `None` at
    /// the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one entry. Returns the snapshot to restore, or `None`
    /// at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The snapshot the cursor points at (always the live state).
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; the history holds at least the seed snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop everything and reseed. Used when a new document is loaded:
    /// history never crosses documents.
    pub fn reset(&mut self, initial: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: u8) -> Snapshot {
        // Distinguishable snapshots without building real layers: selection
        // carries the tag in the uuid bytes.
        let id = uuid::Uuid::from_bytes([tag; 16]);
        Snapshot::new(Vec::new(), Some(id))
    }

    #[test]
    fn test_seeded_history_cannot_undo() {
        let history = History::new(snap(0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(snap(0));
        history.capture(snap(1));
        history.capture(snap(2));

        assert_eq!(history.undo(), Some(&snap(1)));
        assert_eq!(history.undo(), Some(&snap(0)));
        assert_eq!(history.undo(), None);

        assert_eq!(history.redo(), Some(&snap(1)));
        assert_eq!(history.redo(), Some(&snap(2)));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_capture_discards_redo_branch() {
        let mut history = History::new(snap(0));
        history.capture(snap(1));
        history.capture(snap(2));
        history.undo();
        history.undo();

        history.capture(snap(3));

        assert!(!history.can_redo());
        assert_eq!(history.current(), &snap(3));
        // 0 and 3 remain; 1 and 2 are gone.
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(&snap(0)));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::with_capacity(3, snap(0));
        history.capture(snap(1));
        history.capture(snap(2));
        history.capture(snap(3));

        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(&snap(2)));
        assert_eq!(history.undo(), Some(&snap(1)));
        // snap(0) was evicted.
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut history = History::with_capacity(DEFAULT_HISTORY_CAPACITY, snap(0));
        for i in 0..200 {
            history.capture(snap(i as u8));
            assert!(history.len() <= DEFAULT_HISTORY_CAPACITY);
        }
        // At the cap, at most capacity - 1 consecutive undos succeed.
        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, DEFAULT_HISTORY_CAPACITY - 1);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut history = History::new(snap(0));
        history.capture(snap(1));
        history.reset(snap(9));

        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), &snap(9));
    }
}
