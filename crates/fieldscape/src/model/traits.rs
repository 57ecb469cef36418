//! Core traits for the model/view layer.
//!
//! This module defines the trait models implement to be consumed by a view
//! component, and the signal bundle views connect to for change
//! notification.

use fieldscape_core::Signal;

use super::index::ModelIndex;
use super::role::{CheckState, ItemData, ItemRole, LayerTreeRole};

/// The core trait for item models.
///
/// `ItemModel` provides a uniform interface for representing hierarchical
/// data. Views use this interface to query and display data without
/// needing to know the underlying data structure.
///
/// # Failure semantics
///
/// Model reads are defensive: an invalid index, an out-of-bounds position
/// or an unsupported role yields a neutral value (`ItemData::None`, an
/// invalid index, zero rows), never a panic or an error.
pub trait ItemModel: Send + Sync {
    /// Returns the number of rows under the given parent.
    ///
    /// The invalid index addresses the root level.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Returns the number of columns for children of the given parent.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Returns the data stored under the given role for the item at index.
    ///
    /// Return `ItemData::None` if the index is invalid, the role is not
    /// supported, or there is no data for that role.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// Creates a model index for the given row and column under parent.
    ///
    /// Return `ModelIndex::invalid()` if the position is out of bounds.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Returns the parent of the given index.
    ///
    /// Return `ModelIndex::invalid()` for root-level items and invalid
    /// indices.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// Returns the signals for this model.
    ///
    /// Views connect to these to receive notifications about data changes,
    /// insertions and removals.
    fn signals(&self) -> &ModelSignals;

    /// Sets the data for the given index and role.
    ///
    /// Returns `true` if the data was successfully set. The default
    /// implementation returns `false` (read-only).
    fn set_data(&self, _index: &ModelIndex, _value: ItemData, _role: ItemRole) -> bool {
        false
    }

    /// Returns `true` if the item at parent has any children.
    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    /// Returns the display text for an item (convenience for
    /// `data(index, Display)`).
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).into_string()
    }

    /// Returns the check state for an item.
    fn check_state(&self, index: &ModelIndex) -> Option<CheckState> {
        self.data(index, ItemRole::CheckState).as_check_state()
    }
}

/// Collection of signals emitted by item models.
///
/// Views connect to these signals to stay synchronized with the model.
/// Every emission is synchronous: slots run on the mutating call stack,
/// after the mutation is visible.
pub struct ModelSignals {
    /// Emitted after rows have been inserted.
    /// Args: (parent index, first row, last row)
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,

    /// Emitted just before rows are removed.
    /// Args: (parent index, first row, last row)
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,

    /// Emitted after rows have been removed.
    /// Args: (parent index, first row, last row)
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,

    /// Emitted when data in existing items changes.
    /// Args: (top-left index, bottom-right index, changed roles)
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<LayerTreeRole>)>,

    /// Emitted before a layout change (filter invalidation).
    pub layout_about_to_change: Signal<()>,

    /// Emitted after a layout change.
    pub layout_changed: Signal<()>,

    /// Emitted before the model is reset.
    pub model_about_to_reset: Signal<()>,

    /// Emitted after the model has been reset.
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    /// Creates a new set of model signals.
    pub fn new() -> Self {
        Self {
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            layout_about_to_change: Signal::new(),
            layout_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Emits signals for row removal.
    ///
    /// Calls the provided function between the about_to_be_removed and
    /// removed signals.
    pub fn emit_rows_removed<F>(&self, parent: ModelIndex, first: usize, last: usize, remove_fn: F)
    where
        F: FnOnce(),
    {
        self.rows_about_to_be_removed
            .emit((parent.clone(), first, last));
        remove_fn();
        self.rows_removed.emit((parent, first, last));
    }

    /// Emits the data_changed signal for a single item.
    pub fn emit_data_changed_single(&self, index: ModelIndex, roles: Vec<LayerTreeRole>) {
        self.data_changed.emit((index.clone(), index, roles));
    }

    /// Emits signals for a layout change.
    ///
    /// Calls the provided function between the about_to_change and changed
    /// signals.
    pub fn emit_layout_changed<F>(&self, change_fn: F)
    where
        F: FnOnce(),
    {
        self.layout_about_to_change.emit(());
        change_fn();
        self.layout_changed.emit(());
    }

    /// Emits signals for a model reset.
    ///
    /// Calls the provided function between the about_to_reset and reset
    /// signals.
    pub fn emit_reset<F>(&self, reset_fn: F)
    where
        F: FnOnce(),
    {
        self.model_about_to_reset.emit(());
        reset_fn();
        self.model_reset.emit(());
    }
}
