//! The source tree model over a layer hierarchy.
//!
//! `LayerTreeModel` exposes a [`LayerTree`] through the [`ItemModel`]
//! interface and is what the filtering proxy wraps. Its index space mirrors
//! the hierarchy, with one extension: the rows under a *layer* index are
//! that layer's legend entries, so legend symbology shows up as child rows
//! of the layer.
//!
//! Index ↔ node resolution is the contract the proxy builds on:
//!
//! - [`LayerTreeModel::node_at`] resolves an index to a node key. The
//!   invalid index resolves to the root group, so callers asking "which node
//!   do the top-level rows belong to" get an answer instead of a special
//!   case. Legend positions resolve to `None`.
//! - [`LayerTreeModel::legend_at`] resolves an index to a legend position,
//!   carrying the back-reference to the layer node it summarizes.
//! - [`LayerTreeModel::index_of_node`] rebuilds the index of a node from
//!   its parent chain.

use std::sync::Arc;

use slotmap::{Key, KeyData};

use crate::model::{CheckState, ItemData, ItemModel, ItemRole, LayerTreeRole, ModelIndex, ModelSignals};

use super::layer::{MapLayer, NodeKey};
use super::node::{LayerTree, Result};

/// A resolved legend position: which layer, which entry.
///
/// The `layer` key is a back-reference into the hierarchy, never ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendRef {
    /// The layer node whose legend this entry belongs to.
    pub layer: NodeKey,
    /// Row of the entry within the layer's legend.
    pub entry: usize,
}

fn key_to_id(key: NodeKey) -> u64 {
    key.data().as_ffi()
}

fn key_from_id(id: u64) -> NodeKey {
    KeyData::from_ffi(id).into()
}

/// `ItemModel` over a [`LayerTree`].
///
/// Model indices carry the node key in their internal ID; legend rows carry
/// their layer's key (the parent index disambiguates the two).
pub struct LayerTreeModel {
    tree: Arc<LayerTree>,
    signals: ModelSignals,
}

impl LayerTreeModel {
    /// Creates a model over the given hierarchy.
    pub fn new(tree: Arc<LayerTree>) -> Self {
        Self {
            tree,
            signals: ModelSignals::new(),
        }
    }

    /// The wrapped hierarchy.
    pub fn tree(&self) -> &Arc<LayerTree> {
        &self.tree
    }

    // -------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------

    /// Resolves an index to a hierarchy node.
    ///
    /// The invalid index resolves to the root group; legend positions and
    /// stale indices resolve to `None`.
    pub fn node_at(&self, index: &ModelIndex) -> Option<NodeKey> {
        if !index.is_valid() {
            return Some(self.tree.root());
        }
        let parent = index.parent();
        if parent.is_valid() && self.tree.is_layer(key_from_id(parent.internal_id())) {
            // rows under a layer are legend entries, not nodes
            return None;
        }
        let key = key_from_id(index.internal_id());
        self.tree.contains(key).then_some(key)
    }

    /// Resolves an index to a legend position, if it is one.
    pub fn legend_at(&self, index: &ModelIndex) -> Option<LegendRef> {
        if !index.is_valid() {
            return None;
        }
        let parent = index.parent();
        if !parent.is_valid() {
            return None;
        }
        let layer = key_from_id(parent.internal_id());
        if self.tree.is_layer(layer) && index.row() < self.tree.legend_entry_count(layer) {
            Some(LegendRef {
                layer,
                entry: index.row(),
            })
        } else {
            None
        }
    }

    /// Rebuilds the index of a node from its parent chain.
    ///
    /// The root group (and any key not in the tree) yields the invalid
    /// index.
    pub fn index_of_node(&self, key: NodeKey) -> ModelIndex {
        if key == self.tree.root() || !self.tree.contains(key) {
            return ModelIndex::invalid();
        }
        let Some(parent) = self.tree.parent(key) else {
            return ModelIndex::invalid();
        };
        let Some(row) = self.tree.row_of(key) else {
            return ModelIndex::invalid();
        };
        let parent_index = self.index_of_node(parent);
        ModelIndex::with_internal_id(row, 0, parent_index, key_to_id(key))
    }

    // -------------------------------------------------------------------
    // Mutation (delegates into the hierarchy, then notifies)
    // -------------------------------------------------------------------

    /// Adds a group under `parent` and emits `rows_inserted`.
    pub fn add_group(&self, parent: NodeKey, name: impl Into<String>) -> Result<NodeKey> {
        let row = self.tree.child_count(parent);
        let key = self.tree.add_group(parent, name)?;
        self.signals
            .rows_inserted
            .emit((self.index_of_node(parent), row, row));
        Ok(key)
    }

    /// Adds a layer under `parent` and emits `rows_inserted`.
    pub fn add_layer(&self, parent: NodeKey, layer: MapLayer) -> Result<NodeKey> {
        let row = self.tree.child_count(parent);
        let key = self.tree.add_layer(parent, layer)?;
        self.signals
            .rows_inserted
            .emit((self.index_of_node(parent), row, row));
        Ok(key)
    }

    /// Removes a subtree, emitting the row-removal signal pair around the
    /// mutation.
    pub fn remove_node(&self, key: NodeKey) -> Result<()> {
        let Some(row) = self.tree.row_of(key) else {
            // not a row (root or unknown); let the tree report the error
            return self.tree.remove(key);
        };
        let parent_index = match self.tree.parent(key) {
            Some(parent) => self.index_of_node(parent),
            None => ModelIndex::invalid(),
        };
        let mut result = Ok(());
        self.signals.emit_rows_removed(parent_index, row, row, || {
            result = self.tree.remove(key);
        });
        result
    }

    /// Removes everything below the root, as a model reset.
    pub fn clear(&self) {
        self.signals.emit_reset(|| self.tree.clear());
    }

    /// Sets a node's visibility flag and emits `data_changed`.
    pub fn set_node_visible(&self, key: NodeKey, visible: bool) {
        self.tree.set_visible(key, visible);
        self.notify_node_visibility(key);
    }

    /// Sets a node's visibility flag recursively and emits `data_changed`
    /// for the node (descendants follow from it).
    pub fn set_node_visible_recursive(&self, key: NodeKey, visible: bool) {
        self.tree.set_visible_recursive(key, visible);
        self.notify_node_visibility(key);
    }

    /// Sets a legend entry's checked state and emits `data_changed` at the
    /// legend position.
    pub fn set_legend_checked(&self, legend: LegendRef, checked: CheckState) -> bool {
        if !self.tree.set_legend_checked(legend.layer, legend.entry, checked) {
            return false;
        }
        let layer_index = self.index_of_node(legend.layer);
        if layer_index.is_valid() {
            let entry_index = self.index(legend.entry, 0, &layer_index);
            if entry_index.is_valid() {
                self.signals.emit_data_changed_single(
                    entry_index,
                    vec![LayerTreeRole::Item(ItemRole::CheckState)],
                );
            }
        }
        true
    }

    fn notify_node_visibility(&self, key: NodeKey) {
        let index = self.index_of_node(key);
        if index.is_valid() {
            self.signals
                .emit_data_changed_single(index, vec![LayerTreeRole::Item(ItemRole::CheckState)]);
        }
    }
}

impl ItemModel for LayerTreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        match self.node_at(parent) {
            Some(key) if self.tree.is_group(key) => self.tree.child_count(key),
            Some(key) => self.tree.legend_entry_count(key),
            None => 0,
        }
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        if !index.is_valid() {
            return ItemData::None;
        }

        if let Some(legend) = self.legend_at(index) {
            return match role {
                ItemRole::Display => self.tree.legend_label(legend.layer, legend.entry).into(),
                ItemRole::CheckState => self
                    .tree
                    .legend_checked(legend.layer, legend.entry)
                    .map(ItemData::CheckState)
                    .unwrap_or(ItemData::None),
                _ => ItemData::None,
            };
        }

        let Some(key) = self.node_at(index) else {
            return ItemData::None;
        };
        match role {
            ItemRole::Display => self.tree.name(key).into(),
            ItemRole::CheckState => ItemData::CheckState(CheckState::from_bool(self.tree.is_visible(key))),
            ItemRole::ToolTip => self.tree.layer_id(key).into(),
            _ => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column > 0 {
            return ModelIndex::invalid();
        }
        match self.node_at(parent) {
            Some(key) if self.tree.is_group(key) => match self.tree.child_at(key, row) {
                Some(child) => ModelIndex::with_internal_id(row, column, parent.clone(), key_to_id(child)),
                None => ModelIndex::invalid(),
            },
            Some(key) if row < self.tree.legend_entry_count(key) => {
                // legend row under a layer; carries the layer's key
                ModelIndex::with_internal_id(row, column, parent.clone(), key_to_id(key))
            }
            _ => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        index.parent()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}
