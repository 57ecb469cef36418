//! The filtering, role-augmenting proxy over a layer tree.
//!
//! `LayerTreeProxy` is what a view component actually binds to. It wraps a
//! [`LayerTreeModel`], forwards structural queries through a row filter
//! driven by the [`NODE_HIDDEN_PROPERTY`] custom property, and derives the
//! domain roles of [`LayerTreeRole`] from the underlying nodes: which rows
//! are vector layers, their legend image cache keys, their visibility, and
//! whether they can participate in (or currently are in) location
//! tracking.
//!
//! The proxy also owns two small pieces of view state: the set of layers
//! currently in tracking mode, and the name of the map theme matching the
//! tree's current visibility configuration.
//!
//! All notifications are synchronous: `data_changed`, `layout_changed` and
//! `map_theme_changed` fire on the mutating call stack.

use std::sync::Arc;

use parking_lot::RwLock;

use fieldscape_core::{Property, Signal};

use crate::model::{
    CheckState, ItemData, ItemModel, ItemRole, LayerTreeRole, ModelIndex, ModelSignals,
};

use super::layer::{GeometryType, NodeKey};
use super::node::{LayerTree, NODE_HIDDEN_PROPERTY};
use super::theme::{MapThemeRecord, Project};
use super::tree_model::LayerTreeModel;

/// A filtering, role-augmenting view over a layer hierarchy.
///
/// Structural queries (`row_count`, `index`, `parent`) expose the filtered
/// index space; [`LayerTreeProxy::data`] adds the six domain roles on top
/// of the source model's standard ones. See the module docs for the role
/// semantics.
pub struct LayerTreeProxy {
    source: Arc<LayerTreeModel>,
    project: Arc<Project>,
    /// Layer nodes currently in tracking mode. Membership only; holds
    /// keys, never layers.
    layers_in_tracking: RwLock<Vec<NodeKey>>,
    map_theme: Property<String>,
    /// Emitted when the active map theme name changes through
    /// [`LayerTreeProxy::set_map_theme`].
    pub map_theme_changed: Signal<String>,
    signals: ModelSignals,
}

impl LayerTreeProxy {
    /// Creates a proxy over the given hierarchy, wrapping it in a fresh
    /// source model. The tracking set starts empty, the map theme name
    /// empty.
    pub fn new(layer_tree: Arc<LayerTree>, project: Arc<Project>) -> Self {
        Self {
            source: Arc::new(LayerTreeModel::new(layer_tree)),
            project,
            layers_in_tracking: RwLock::new(Vec::new()),
            map_theme: Property::new(String::new()),
            map_theme_changed: Signal::new(),
            signals: ModelSignals::new(),
        }
    }

    /// The wrapped source model.
    pub fn layer_tree_model(&self) -> &Arc<LayerTreeModel> {
        &self.source
    }

    /// The underlying hierarchy.
    pub fn layer_tree(&self) -> &Arc<LayerTree> {
        self.source.tree()
    }

    /// The project this proxy resolves map themes against.
    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    // -------------------------------------------------------------------
    // Roles
    // -------------------------------------------------------------------

    /// Returns the field of the item at `index` for the given role.
    ///
    /// Unresolvable positions degrade to neutral values (`ItemData::None`,
    /// `false`, the empty string), never an error.
    pub fn data(&self, index: &ModelIndex, role: LayerTreeRole) -> ItemData {
        let source_index = self.map_to_source(index);
        match role {
            LayerTreeRole::VectorLayer => self
                .source
                .node_at(&source_index)
                .and_then(|key| self.layer_tree().vector_layer(key))
                .map(ItemData::VectorLayer)
                .unwrap_or(ItemData::None),

            LayerTreeRole::LegendImage => {
                let tree = self.layer_tree();
                let key = if let Some(legend) = self.source.legend_at(&source_index) {
                    format!(
                        "legend/{}/{}",
                        tree.layer_id(legend.layer).unwrap_or_default(),
                        tree.legend_label(legend.layer, legend.entry).unwrap_or_default()
                    )
                } else {
                    match self.source.node_at(&source_index) {
                        Some(node) if tree.is_layer(node) => {
                            format!("layer/{}", tree.layer_id(node).unwrap_or_default())
                        }
                        _ => String::new(),
                    }
                };
                ItemData::String(key)
            }

            LayerTreeRole::NodeType => {
                let tree = self.layer_tree();
                let kind = match self.source.node_at(&source_index) {
                    Some(node) if tree.is_layer(node) => "layer",
                    Some(node) if tree.is_group(node) => "group",
                    _ => "legend",
                };
                ItemData::String(kind.to_string())
            }

            LayerTreeRole::Visible => {
                if let Some(legend) = self.source.legend_at(&source_index) {
                    self.layer_tree()
                        .legend_checked(legend.layer, legend.entry)
                        .map(|state| ItemData::Bool(state.is_checked()))
                        .unwrap_or(ItemData::None)
                } else {
                    self.source
                        .node_at(&source_index)
                        .map(|key| ItemData::Bool(self.layer_tree().is_visible(key)))
                        .unwrap_or(ItemData::None)
                }
            }

            LayerTreeRole::Trackable => {
                let trackable = self
                    .source
                    .node_at(&source_index)
                    .and_then(|key| self.layer_tree().vector_layer(key))
                    .is_some_and(|layer| {
                        matches!(layer.geometry, GeometryType::Line | GeometryType::Polygon)
                    });
                ItemData::Bool(trackable)
            }

            LayerTreeRole::InTracking => {
                let in_tracking = self
                    .source
                    .node_at(&source_index)
                    .filter(|&key| self.layer_tree().is_layer(key))
                    .is_some_and(|key| self.layers_in_tracking.read().contains(&key));
                ItemData::Bool(in_tracking)
            }

            LayerTreeRole::Item(role) => self.source.data(&source_index, role),
        }
    }

    /// Sets the field of the item at `index` for the given role.
    ///
    /// Only [`LayerTreeRole::Visible`] is writable: legend positions get
    /// their checked state set from the boolean value, node positions get
    /// their visibility flag applied recursively to every descendant.
    /// Every other role is rejected without a state change.
    pub fn set_data(&self, index: &ModelIndex, value: ItemData, role: LayerTreeRole) -> bool {
        if role != LayerTreeRole::Visible {
            return false;
        }

        let checked = value.to_checked();
        let source_index = self.map_to_source(index);
        if let Some(legend) = self.source.legend_at(&source_index) {
            self.source
                .set_legend_checked(legend, CheckState::from_bool(checked));
        } else if let Some(key) = self.source.node_at(&source_index) {
            self.source.set_node_visible_recursive(key, checked);
        }
        tracing::debug!(
            target: "fieldscape::layertree::proxy",
            row = index.row(),
            visible = checked,
            "visibility set through proxy"
        );
        self.signals
            .emit_data_changed_single(index.clone(), vec![LayerTreeRole::Visible]);
        true
    }

    /// The role-name table a view binds to: the standard roles of the
    /// source model extended with the six domain roles.
    pub fn role_names(&self) -> Vec<(LayerTreeRole, &'static str)> {
        let standard = [
            ItemRole::Display,
            ItemRole::Decoration,
            ItemRole::ToolTip,
            ItemRole::CheckState,
        ];
        let custom = [
            LayerTreeRole::VectorLayer,
            LayerTreeRole::LegendImage,
            LayerTreeRole::NodeType,
            LayerTreeRole::Visible,
            LayerTreeRole::Trackable,
            LayerTreeRole::InTracking,
        ];
        standard
            .into_iter()
            .map(LayerTreeRole::Item)
            .chain(custom)
            .filter_map(|role| role.name().map(|name| (role, name)))
            .collect()
    }

    // -------------------------------------------------------------------
    // Map theme
    // -------------------------------------------------------------------

    /// The active map theme name; empty when no theme matches.
    pub fn map_theme(&self) -> String {
        self.map_theme.get()
    }

    /// Sets the active map theme name.
    ///
    /// Setting the current value is a no-op; a different value is stored
    /// and announced through [`LayerTreeProxy::map_theme_changed`]. The
    /// setter performs no validation against the project's persisted
    /// themes.
    pub fn set_map_theme(&self, map_theme: impl Into<String>) {
        let map_theme = map_theme.into();
        if self.map_theme.set(map_theme.clone()) {
            tracing::debug!(
                target: "fieldscape::layertree::proxy",
                theme = %map_theme,
                "map theme changed"
            );
            self.map_theme_changed.emit(map_theme);
        }
    }

    /// Recomputes the active map theme name from the tree's current state.
    ///
    /// Clears the stored name, then compares the current per-layer
    /// visibility against every persisted theme (order-insensitive,
    /// visibility only; ordering and collapse state are not part of the
    /// match). The first matching theme in enumeration order wins; with no
    /// match the name stays empty. Stores directly, without the
    /// changed-signal of the setter.
    pub fn update_current_map_theme(&self) {
        self.map_theme.set_silent(String::new());

        let current = MapThemeRecord::from_current_state(self.layer_tree());
        let themes = self.project.map_theme_collection();
        for name in themes.map_themes() {
            let matches = themes
                .map_theme_state(&name)
                .is_some_and(|record| record.matches_layers(&current));
            if matches {
                tracing::debug!(
                    target: "fieldscape::layertree::proxy",
                    theme = %name,
                    "current visibility matches persisted map theme"
                );
                self.map_theme.set_silent(name);
                return;
            }
        }
        tracing::trace!(
            target: "fieldscape::layertree::proxy",
            "no persisted map theme matches current visibility"
        );
    }

    // -------------------------------------------------------------------
    // Tracking
    // -------------------------------------------------------------------

    /// Puts a layer into, or takes it out of, tracking mode.
    ///
    /// Enabling an already-tracked layer or disabling an untracked one
    /// leaves the set unchanged. Afterwards, a `data_changed` notification
    /// for [`LayerTreeRole::InTracking`] is emitted at the layer's filtered
    /// position, but only when that position is valid: a layer that is
    /// filtered out produces no notification.
    pub fn set_layer_in_tracking(&self, layer: NodeKey, tracking: bool) {
        if !self.layer_tree().is_layer(layer) {
            tracing::warn!(
                target: "fieldscape::layertree::proxy",
                "ignoring tracking request for a non-layer node"
            );
            return;
        }

        {
            let mut tracked = self.layers_in_tracking.write();
            if tracking {
                if !tracked.contains(&layer) {
                    tracked.push(layer);
                }
            } else if let Some(position) = tracked.iter().position(|&key| key == layer) {
                tracked.remove(position);
            }
        }
        tracing::debug!(
            target: "fieldscape::layertree::proxy",
            tracking,
            "layer tracking flag set"
        );

        let source_index = self.source.index_of_node(layer);
        let index = self.map_from_source(&source_index);
        if index.is_valid() {
            self.signals
                .emit_data_changed_single(index, vec![LayerTreeRole::InTracking]);
        }
    }

    /// The layers currently in tracking mode.
    pub fn tracked_layers(&self) -> Vec<NodeKey> {
        self.layers_in_tracking.read().clone()
    }

    // -------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------

    /// The row filter: a child row of a group is excluded when its
    /// [`NODE_HIDDEN_PROPERTY`] custom property reads `"true"` (missing
    /// defaults to `"false"`). Rows whose parent is not a group (legend
    /// entries under a layer) are always included.
    ///
    /// Both arguments are in *source* index space.
    pub fn filter_accepts_row(&self, source_row: usize, source_parent: &ModelIndex) -> bool {
        let tree = self.layer_tree();
        let Some(parent) = self.source.node_at(source_parent) else {
            return true;
        };
        if !tree.is_group(parent) {
            return true;
        }
        let Some(child) = tree.child_at(parent, source_row) else {
            return true;
        };
        tree.custom_property(child, NODE_HIDDEN_PROPERTY, "false") != "true"
    }

    /// Re-evaluates the filter, announcing the change through the
    /// layout-changed signal pair.
    ///
    /// Row acceptance is computed on demand, so there is no cached mapping
    /// to rebuild; this exists for views to resync after bulk hierarchy
    /// edits that changed hidden flags.
    pub fn invalidate(&self) {
        self.signals.emit_layout_changed(|| {});
    }

    /// Source rows under `source_parent` that pass the filter, in order.
    fn accepted_rows(&self, source_parent: &ModelIndex) -> Vec<usize> {
        (0..self.source.row_count(source_parent))
            .filter(|&row| self.filter_accepts_row(row, source_parent))
            .collect()
    }

    // -------------------------------------------------------------------
    // Index mapping
    // -------------------------------------------------------------------

    /// Maps a filtered-space index to the source index space.
    pub fn map_to_source(&self, proxy_index: &ModelIndex) -> ModelIndex {
        if !proxy_index.is_valid() {
            return ModelIndex::invalid();
        }
        let proxy_parent = proxy_index.parent();
        let source_parent = self.map_to_source(&proxy_parent);
        if proxy_parent.is_valid() && !source_parent.is_valid() {
            return ModelIndex::invalid();
        }
        match self.accepted_rows(&source_parent).get(proxy_index.row()) {
            Some(&source_row) => self
                .source
                .index(source_row, proxy_index.column(), &source_parent),
            None => ModelIndex::invalid(),
        }
    }

    /// Maps a source index to the filtered index space.
    ///
    /// Yields the invalid index when the row, or any of its ancestors,
    /// is filtered out.
    pub fn map_from_source(&self, source_index: &ModelIndex) -> ModelIndex {
        if !source_index.is_valid() {
            return ModelIndex::invalid();
        }
        let source_parent = source_index.parent();
        let proxy_parent = self.map_from_source(&source_parent);
        if source_parent.is_valid() && !proxy_parent.is_valid() {
            return ModelIndex::invalid();
        }
        let accepted = self.accepted_rows(&source_parent);
        match accepted.iter().position(|&row| row == source_index.row()) {
            Some(proxy_row) => ModelIndex::with_internal_id(
                proxy_row,
                source_index.column(),
                proxy_parent,
                source_index.internal_id(),
            ),
            None => ModelIndex::invalid(),
        }
    }
}

impl ItemModel for LayerTreeProxy {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        let source_parent = self.map_to_source(parent);
        if parent.is_valid() && !source_parent.is_valid() {
            return 0;
        }
        self.accepted_rows(&source_parent).len()
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        self.source.column_count(&self.map_to_source(parent))
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        self.data(index, LayerTreeRole::Item(role))
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        let source_parent = self.map_to_source(parent);
        if parent.is_valid() && !source_parent.is_valid() {
            return ModelIndex::invalid();
        }
        let Some(&source_row) = self.accepted_rows(&source_parent).get(row) else {
            return ModelIndex::invalid();
        };
        let source_child = self.source.index(source_row, column, &source_parent);
        if !source_child.is_valid() {
            return ModelIndex::invalid();
        }
        ModelIndex::with_internal_id(row, column, parent.clone(), source_child.internal_id())
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        index.parent()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        self.set_data(index, value, LayerTreeRole::Item(role))
    }
}
