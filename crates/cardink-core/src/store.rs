//! The document store: owns the live document and its history, and exposes
//! the mutation API everything else goes through.
//!
//! One store instance is created by the composition root per editing
//! session and passed by reference to callers; there are no globals. All
//! operations run synchronously inside a single UI callback. Expected
//! failure conditions (missing ids, guarded background edits) are silent
//! no-ops with a `bool`/`Option` return, never panics.

use crate::document::{Document, DocumentError};
use crate::history::{History, Snapshot};
use crate::layers::{Layer, LayerId, LayerPatch};
use kurbo::{Point, Size};

/// Position offset applied to duplicated layers.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Owns the canonical document state and keeps history in lockstep:
/// immediately after any mutating call returns, the history's current
/// snapshot equals the live `(layers, selected_id)`.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    document: Document,
    history: History,
}

impl DocumentStore {
    /// Create a store around a fresh document (one background layer).
    pub fn new(name: impl Into<String>, canvas_size: Size) -> Self {
        let document = Document::new(name, canvas_size);
        let history = History::new(snapshot_of(&document));
        Self { document, history }
    }

    /// Create a store with a custom history capacity.
    pub fn with_history_capacity(
        name: impl Into<String>,
        canvas_size: Size,
        capacity: usize,
    ) -> Self {
        let document = Document::new(name, canvas_size);
        let history = History::with_capacity(capacity, snapshot_of(&document));
        Self { document, history }
    }

    /// The live document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Layers in z-order (back to front).
    pub fn layers(&self) -> &[Layer] {
        &self.document.layers
    }

    /// Find a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.document.layer(id)
    }

    pub fn selected_id(&self) -> Option<LayerId> {
        self.document.selected_id
    }

    /// The selected layer, if any.
    pub fn selected_layer(&self) -> Option<&Layer> {
        self.document.selected_id.and_then(|id| self.document.layer(id))
    }

    pub fn canvas_size(&self) -> Size {
        self.document.canvas_size
    }

    /// Append a layer with a fresh id, select it, and record a snapshot.
    /// Always succeeds; returns the assigned id.
    pub fn add_layer(&mut self, mut layer: Layer) -> LayerId {
        layer.regenerate_id();
        // Normalize whatever the caller built.
        layer.set_opacity(layer.opacity());
        let id = layer.id();
        self.document.layers.push(layer);
        self.document.selected_id = Some(id);
        self.commit();
        id
    }

    /// Merge a partial update into the matching layer. Returns `false`
    /// (no state change, no snapshot) when the id is unknown.
    pub fn update_layer(&mut self, id: LayerId, patch: &LayerPatch) -> bool {
        let Some(layer) = self.document.layer_mut(id) else {
            log::debug!("update_layer: no layer {id}");
            return false;
        };
        layer.apply_patch(patch);
        self.commit();
        true
    }

    /// Closure-based edit for variant-specific fields (property panels).
    /// Opacity is re-clamped and the background re-locked afterwards, so a
    /// closure cannot break the invariants.
    pub fn update_layer_with(&mut self, id: LayerId, f: impl FnOnce(&mut Layer)) -> bool {
        let Some(layer) = self.document.layer_mut(id) else {
            log::debug!("update_layer_with: no layer {id}");
            return false;
        };
        f(layer);
        layer.set_opacity(layer.opacity());
        if layer.is_background() {
            layer.set_locked(true);
        }
        self.commit();
        true
    }

    /// Remove a layer. The background (index 0) is never removed; a
    /// matching selection is cleared. Returns `false` for unknown ids and
    /// the background.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        match self.document.index_of(id) {
            None => {
                log::debug!("delete_layer: no layer {id}");
                false
            }
            Some(0) => {
                log::warn!("delete_layer: refusing to remove the background layer");
                false
            }
            Some(index) => {
                self.document.layers.remove(index);
                if self.document.selected_id == Some(id) {
                    self.document.selected_id = None;
                }
                self.commit();
                true
            }
        }
    }

    /// Clone a layer with a fresh id, a derived name, and a small position
    /// offset, inserted directly after its source; the copy is selected.
    /// Returns `None` for unknown ids and the background.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Option<LayerId> {
        let index = self.document.index_of(id)?;
        if index == 0 {
            log::warn!("duplicate_layer: refusing to duplicate the background layer");
            return None;
        }

        let mut copy = self.document.layers[index].clone();
        copy.regenerate_id();
        copy.set_name(Some(format!("{} copy", copy.display_name())));
        let position = copy.position();
        copy.set_position(Point::new(
            position.x + DUPLICATE_OFFSET,
            position.y + DUPLICATE_OFFSET,
        ));
        let new_id = copy.id();

        self.document.layers.insert(index + 1, copy);
        self.document.selected_id = Some(new_id);
        self.commit();
        Some(new_id)
    }

    /// Move a layer from one z-order index to another. The background never
    /// moves: any reorder touching index 0 is rejected, as are out-of-range
    /// indices.
    pub fn reorder_layers(&mut self, from: usize, to: usize) -> bool {
        let len = self.document.layers.len();
        if from == 0 || to == 0 {
            log::warn!("reorder_layers: background position is fixed");
            return false;
        }
        if from >= len || to >= len || from == to {
            log::debug!("reorder_layers: rejected move {from} -> {to} (len {len})");
            return false;
        }
        let layer = self.document.layers.remove(from);
        self.document.layers.insert(to, layer);
        self.commit();
        true
    }

    /// Move a layer one step toward the front.
    pub fn bring_forward(&mut self, id: LayerId) -> bool {
        match self.document.index_of(id) {
            Some(index) => self.reorder_layers(index, index + 1),
            None => false,
        }
    }

    /// Move a layer one step toward the back (index 1 is the floor).
    pub fn send_backward(&mut self, id: LayerId) -> bool {
        match self.document.index_of(id) {
            Some(index) if index > 1 => self.reorder_layers(index, index - 1),
            _ => false,
        }
    }

    /// Move a layer to the front of the stack.
    pub fn bring_to_front(&mut self, id: LayerId) -> bool {
        let last = self.document.layers.len() - 1;
        match self.document.index_of(id) {
            Some(index) => self.reorder_layers(index, last),
            None => false,
        }
    }

    /// Move a layer to the back of the stack, directly above the background.
    pub fn send_to_back(&mut self, id: LayerId) -> bool {
        match self.document.index_of(id) {
            Some(index) => self.reorder_layers(index, 1),
            None => false,
        }
    }

    /// Change the selection. Not an undoable edit: no snapshot is taken.
    /// Selecting an unknown id is a no-op.
    pub fn select_layer(&mut self, id: Option<LayerId>) {
        match id {
            None => self.document.selected_id = None,
            Some(id) => {
                if self.document.layer(id).is_some() {
                    self.document.selected_id = Some(id);
                } else {
                    log::debug!("select_layer: no layer {id}");
                }
            }
        }
    }

    /// Ids of the visible layers under a point, front-most first. The
    /// background never matches. Pure query.
    pub fn layers_at_point(&self, point: Point, tolerance: f64) -> Vec<LayerId> {
        self.document
            .layers
            .iter()
            .rev()
            .filter(|l| l.visible() && l.hit_test(point, tolerance))
            .map(Layer::id)
            .collect()
    }

    /// The front-most visible layer under a point.
    pub fn layer_at_point(&self, point: Point, tolerance: f64) -> Option<LayerId> {
        self.layers_at_point(point, tolerance).into_iter().next()
    }

    /// Step the document back one history entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Step the document forward one history entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the document wholesale (file open, autosave restore) and
    /// reset history: undo never crosses documents. On a validation error
    /// the live document and history are untouched.
    pub fn load_document(&mut self, document: Document) -> Result<(), DocumentError> {
        document.validate()?;
        self.history.reset(snapshot_of(&document));
        self.document = document;
        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.document.layers = snapshot.layers;
        self.document.selected_id = snapshot.selected_id;
        self.document.touch();
    }

    /// Record the post-mutation state. Called at the end of every mutating
    /// operation, never deferred.
    fn commit(&mut self) {
        self.document.touch();
        self.history.capture(snapshot_of(&self.document));
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new("Untitled", Document::DEFAULT_CANVAS_SIZE)
    }
}

fn snapshot_of(document: &Document) -> Snapshot {
    Snapshot::new(document.layers.clone(), document.selected_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ChipIcon, ContactChip, Image, LayerKind, QrCode, Text};

    fn text_layer(x: f64, y: f64) -> Layer {
        Layer::Text(Text::new(Point::new(x, y), "sample".to_string()))
    }

    fn store_with_layers(n: usize) -> (DocumentStore, Vec<LayerId>) {
        let mut store = DocumentStore::default();
        let ids = (0..n)
            .map(|i| store.add_layer(text_layer(i as f64 * 10.0, 0.0)))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_add_layer_selects_and_appends() {
        let mut store = DocumentStore::default();
        let id = store.add_layer(text_layer(5.0, 5.0));

        assert_eq!(store.layers().len(), 2);
        assert_eq!(store.layers()[1].id(), id);
        assert_eq!(store.selected_id(), Some(id));
    }

    #[test]
    fn test_add_layer_assigns_fresh_id() {
        let mut store = DocumentStore::default();
        let layer = text_layer(0.0, 0.0);
        let original_id = layer.id();
        let assigned = store.add_layer(layer);
        assert_ne!(assigned, original_id);
    }

    #[test]
    fn test_update_layer_moves() {
        let (mut store, ids) = store_with_layers(1);
        let moved = store.update_layer(ids[0], &LayerPatch::new().position(Point::new(77.0, 88.0)));
        assert!(moved);
        assert_eq!(store.layer(ids[0]).unwrap().position(), Point::new(77.0, 88.0));
    }

    #[test]
    fn test_update_missing_id_is_noop_without_snapshot() {
        let (mut store, _) = store_with_layers(1);
        let before = store.document().clone();
        let could_undo = store.can_undo();

        let updated = store.update_layer(
            uuid::Uuid::new_v4(),
            &LayerPatch::new().position(Point::new(1.0, 1.0)),
        );

        assert!(!updated);
        assert_eq!(store.document().layers, before.layers);
        assert_eq!(store.can_undo(), could_undo);
        // A real update after the no-op undoes straight back to `before`.
        store.update_layer(ids_of(&before)[1], &LayerPatch::new().rotation(10.0));
        store.undo();
        assert_eq!(store.document().layers, before.layers);
    }

    fn ids_of(document: &Document) -> Vec<LayerId> {
        document.layers.iter().map(Layer::id).collect()
    }

    #[test]
    fn test_empty_patch_is_idempotent() {
        let (mut store, ids) = store_with_layers(1);
        let before = store.layer(ids[0]).unwrap().clone();
        store.update_layer(ids[0], &LayerPatch::new());
        assert_eq!(store.layer(ids[0]).unwrap(), &before);
    }

    #[test]
    fn test_delete_layer_clears_selection() {
        let (mut store, ids) = store_with_layers(2);
        assert_eq!(store.selected_id(), Some(ids[1]));

        assert!(store.delete_layer(ids[1]));
        assert_eq!(store.layers().len(), 2);
        assert_eq!(store.selected_id(), None);
        assert!(store.layer(ids[1]).is_none());
    }

    #[test]
    fn test_delete_keeps_unrelated_selection() {
        let (mut store, ids) = store_with_layers(2);
        store.select_layer(Some(ids[1]));
        assert!(store.delete_layer(ids[0]));
        assert_eq!(store.selected_id(), Some(ids[1]));
    }

    #[test]
    fn test_background_cannot_be_deleted() {
        let mut store = DocumentStore::default();
        let bg_id = store.layers()[0].id();
        assert!(!store.delete_layer(bg_id));
        assert_eq!(store.layers().len(), 1);
        assert!(store.layers()[0].is_background());
    }

    #[test]
    fn test_background_survives_hostile_sequences() {
        let (mut store, ids) = store_with_layers(3);
        let bg_id = store.layers()[0].id();

        store.delete_layer(bg_id);
        store.reorder_layers(0, 2);
        store.reorder_layers(2, 0);
        store.send_to_back(ids[2]);
        store.bring_to_front(bg_id);
        store.delete_layer(ids[0]);
        store.undo();
        store.redo();

        assert!(store.layers()[0].is_background());
        assert_eq!(store.layers()[0].id(), bg_id);
        assert!(store.document().validate().is_ok());
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let (mut store, ids) = store_with_layers(2);
        let copy_id = store.duplicate_layer(ids[0]).unwrap();

        // Background, source, copy, second layer.
        let order: Vec<LayerId> = store.layers().iter().map(Layer::id).collect();
        assert_eq!(order[1], ids[0]);
        assert_eq!(order[2], copy_id);
        assert_eq!(order[3], ids[1]);
        assert_eq!(store.selected_id(), Some(copy_id));

        let source = store.layer(ids[0]).unwrap();
        let copy = store.layer(copy_id).unwrap();
        assert_eq!(
            copy.position(),
            Point::new(
                source.position().x + DUPLICATE_OFFSET,
                source.position().y + DUPLICATE_OFFSET
            )
        );
        // Source is unnamed, so the derived name comes from the kind label.
        assert_eq!(copy.name(), Some("Text copy"));
    }

    #[test]
    fn test_duplicate_background_refused() {
        let mut store = DocumentStore::default();
        let bg_id = store.layers()[0].id();
        assert!(store.duplicate_layer(bg_id).is_none());
        assert_eq!(store.layers().len(), 1);
    }

    #[test]
    fn test_ids_stay_unique_across_operations() {
        let (mut store, ids) = store_with_layers(3);
        store.duplicate_layer(ids[1]);
        store.delete_layer(ids[0]);
        store.add_layer(text_layer(1.0, 1.0));
        store.undo();
        store.redo();

        let mut seen = std::collections::HashSet::new();
        for layer in store.layers() {
            assert!(seen.insert(layer.id()), "duplicate id {}", layer.id());
        }
    }

    #[test]
    fn test_reorder_moves_layer() {
        let (mut store, ids) = store_with_layers(3);
        assert!(store.reorder_layers(1, 3));
        let order: Vec<LayerId> = store.layers().iter().map(Layer::id).collect();
        assert_eq!(order[1], ids[1]);
        assert_eq!(order[2], ids[2]);
        assert_eq!(order[3], ids[0]);
    }

    #[test]
    fn test_reorder_rejects_background_and_range() {
        let (mut store, _) = store_with_layers(2);
        assert!(!store.reorder_layers(0, 1));
        assert!(!store.reorder_layers(1, 0));
        assert!(!store.reorder_layers(1, 9));
        assert!(!store.reorder_layers(9, 1));
        assert!(!store.reorder_layers(1, 1));
    }

    #[test]
    fn test_z_order_helpers_clamp_at_one() {
        let (mut store, ids) = store_with_layers(2);
        assert!(!store.send_backward(ids[0]));
        assert!(store.send_backward(ids[1]));
        let order: Vec<LayerId> = store.layers().iter().map(Layer::id).collect();
        assert_eq!(order[1], ids[1]);
        assert_eq!(order[2], ids[0]);
        assert!(!store.bring_forward(ids[0]));
    }

    #[test]
    fn test_selection_is_not_undoable() {
        let (mut store, ids) = store_with_layers(2);
        store.select_layer(None);
        store.select_layer(Some(ids[0]));
        // Undo steps back over the add, not over the selection changes.
        assert!(store.undo());
        assert_eq!(store.layers().len(), 2);
    }

    #[test]
    fn test_select_missing_id_is_noop() {
        let (mut store, ids) = store_with_layers(1);
        store.select_layer(Some(ids[0]));
        store.select_layer(Some(uuid::Uuid::new_v4()));
        assert_eq!(store.selected_id(), Some(ids[0]));
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let (mut store, ids) = store_with_layers(1);
        let before_layers = store.document().layers.clone();
        let before_selection = store.selected_id();

        store.update_layer(ids[0], &LayerPatch::new().position(Point::new(300.0, 300.0)));
        let after_layers = store.document().layers.clone();

        assert!(store.undo());
        assert_eq!(store.document().layers, before_layers);
        assert_eq!(store.selected_id(), before_selection);

        assert!(store.redo());
        assert_eq!(store.document().layers, after_layers);
    }

    #[test]
    fn test_history_bounded_at_fifty() {
        let (mut store, ids) = store_with_layers(1);
        for i in 0..120 {
            store.update_layer(ids[0], &LayerPatch::new().rotation(i as f64));
        }
        let mut undos = 0;
        while store.undo() {
            undos += 1;
        }
        assert!(undos <= 49);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_hit_testing_front_to_back() {
        let mut store = DocumentStore::default();
        let below = store.add_layer(Layer::Image(
            Image::from_uri(Point::new(0.0, 0.0), "a.png").with_size(100.0, 100.0),
        ));
        let above = store.add_layer(Layer::Image(
            Image::from_uri(Point::new(50.0, 50.0), "b.png").with_size(100.0, 100.0),
        ));

        let hits = store.layers_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![above, below]);
        assert_eq!(store.layer_at_point(Point::new(25.0, 25.0), 0.0), Some(below));
        // The background occupies no hit area.
        assert_eq!(store.layer_at_point(Point::new(-500.0, -500.0), 0.0), None);
    }

    #[test]
    fn test_hidden_layers_are_not_hit() {
        let mut store = DocumentStore::default();
        let id = store.add_layer(Layer::Image(
            Image::from_uri(Point::ZERO, "a.png").with_size(100.0, 100.0),
        ));
        let mut patch = LayerPatch::new();
        patch.visible = Some(false);
        store.update_layer(id, &patch);
        assert!(store.layers_at_point(Point::new(50.0, 50.0), 0.0).is_empty());
    }

    #[test]
    fn test_load_document_resets_history() {
        let (mut store, ids) = store_with_layers(2);
        assert!(store.can_undo());

        let incoming = Document::new("Fresh", Size::new(400.0, 400.0));
        store.load_document(incoming.clone()).unwrap();

        assert_eq!(store.document().id, incoming.id);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(store.layer(ids[0]).is_none());
    }

    #[test]
    fn test_load_invalid_document_leaves_state_untouched() {
        let (mut store, _) = store_with_layers(1);
        let before = store.document().clone();

        let mut bad = Document::new("Bad", Size::new(100.0, 100.0));
        bad.selected_id = Some(uuid::Uuid::new_v4());

        assert!(store.load_document(bad).is_err());
        assert_eq!(store.document(), &before);
        assert!(store.can_undo());
    }

    #[test]
    fn test_update_layer_with_edits_payload() {
        let mut store = DocumentStore::default();
        let id = store.add_layer(Layer::QrCode(QrCode::new(
            Point::ZERO,
            "https://old.example".to_string(),
        )));

        let updated = store.update_layer_with(id, |layer| {
            if let Layer::QrCode(qr) = layer {
                qr.data = "https://new.example".to_string();
            }
        });

        assert!(updated);
        match store.layer(id).unwrap() {
            Layer::QrCode(qr) => assert_eq!(qr.data, "https://new.example"),
            other => panic!("expected QR layer, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_update_layer_with_reclamps_opacity() {
        let mut store = DocumentStore::default();
        let id = store.add_layer(Layer::ContactChip(ContactChip::new(
            Point::ZERO,
            ChipIcon::Phone,
            "555-0100".to_string(),
        )));
        store.update_layer_with(id, |layer| layer.set_rotation(15.0));
        assert_eq!(store.layer(id).unwrap().kind(), LayerKind::ContactChip);

        store.update_layer_with(id, |layer| {
            if let Layer::ContactChip(chip) = layer {
                chip.opacity = 4.0;
            }
        });
        assert!((store.layer(id).unwrap().opacity() - 1.0).abs() < f64::EPSILON);
    }
}
