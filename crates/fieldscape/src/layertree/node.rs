//! The layer hierarchy: groups, layer nodes, visibility and custom
//! properties.
//!
//! A [`LayerTree`] owns every node of one hierarchy in keyed storage and is
//! the single mutation point for it. Node identity is a [`NodeKey`];
//! consumers (models, proxies, tracking sets, legend references) hold keys,
//! never nodes, so nothing outside the tree can keep a node alive or
//! destroy one.
//!
//! A node is either a group (carries a name and children) or a layer
//! (carries a [`MapLayer`], no node children). The root is a group that is
//! not addressable as a row. Every node has a visibility flag and a map of
//! string custom properties; the [`NODE_HIDDEN_PROPERTY`] property is what
//! the filtering proxy reads to exclude rows.

use std::collections::HashMap;

use parking_lot::RwLock;
use slotmap::SlotMap;

use crate::model::CheckState;

use super::layer::{MapLayer, NodeKey, VectorLayerRef};

/// Custom property marking a node as hidden from filtered views.
///
/// The value `"true"` excludes the node; anything else, or a missing
/// property, leaves it visible. Stored as a string because custom
/// properties are a string-to-string map.
pub const NODE_HIDDEN_PROPERTY: &str = "nodeHidden";

/// Errors from hierarchy mutations.
///
/// Read operations never fail (they degrade to `None`/defaults), but the
/// mutation API reports structurally impossible requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayerTreeError {
    /// The referenced node does not exist in this tree.
    #[error("node not found in layer tree")]
    NodeNotFound,
    /// The operation requires a group node.
    #[error("node is not a group")]
    NotAGroup,
    /// The root group cannot be removed.
    #[error("the root group cannot be removed")]
    RootNode,
}

/// Result type for hierarchy mutations.
pub type Result<T> = std::result::Result<T, LayerTreeError>;

/// The two node kinds. Closed: a node is exactly one of these.
enum NodeKind {
    Group { name: String },
    Layer(MapLayer),
}

/// A node in the hierarchy.
struct Node {
    kind: NodeKind,
    visible: bool,
    custom_properties: HashMap<String, String>,
    parent: Option<NodeKey>,
    /// Child nodes; always empty for layers.
    children: Vec<NodeKey>,
}

impl Node {
    fn group(name: String, parent: Option<NodeKey>) -> Self {
        Self {
            kind: NodeKind::Group { name },
            visible: true,
            custom_properties: HashMap::new(),
            parent,
            children: Vec::new(),
        }
    }

    fn layer(layer: MapLayer, parent: NodeKey) -> Self {
        Self {
            kind: NodeKind::Layer(layer),
            visible: true,
            custom_properties: HashMap::new(),
            parent: Some(parent),
            children: Vec::new(),
        }
    }
}

struct TreeStorage {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
}

impl TreeStorage {
    fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group(String::new(), None));
        Self { nodes, root }
    }

    fn subtree_keys(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                keys.push(current);
                stack.extend(node.children.iter().copied());
            }
        }
        keys
    }
}

/// A hierarchy of map layers and groups.
///
/// Uses interior mutability (`RwLock`), so the tree can be shared between
/// the source model, the proxy and the application through an `Arc` while
/// still being mutated through `&self`.
pub struct LayerTree {
    storage: RwLock<TreeStorage>,
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerTree {
    /// Creates a tree holding only the root group.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(TreeStorage::new()),
        }
    }

    /// The root group.
    ///
    /// Always present; it is the parent of every top-level node and is not
    /// itself addressable as a row.
    pub fn root(&self) -> NodeKey {
        self.storage.read().root
    }

    /// Returns `true` if the key refers to a live node of this tree.
    pub fn contains(&self, key: NodeKey) -> bool {
        self.storage.read().nodes.contains_key(key)
    }

    /// Returns `true` if the node exists and is a group.
    pub fn is_group(&self, key: NodeKey) -> bool {
        self.storage
            .read()
            .nodes
            .get(key)
            .is_some_and(|node| matches!(node.kind, NodeKind::Group { .. }))
    }

    /// Returns `true` if the node exists and is a layer.
    pub fn is_layer(&self, key: NodeKey) -> bool {
        self.storage
            .read()
            .nodes
            .get(key)
            .is_some_and(|node| matches!(node.kind, NodeKind::Layer(_)))
    }

    // -------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------

    /// Adds a group under `parent`.
    pub fn add_group(&self, parent: NodeKey, name: impl Into<String>) -> Result<NodeKey> {
        let name = name.into();
        let mut storage = self.storage.write();
        Self::ensure_group(&storage, parent)?;
        let key = storage.nodes.insert(Node::group(name, Some(parent)));
        storage.nodes[parent].children.push(key);
        tracing::trace!(target: "fieldscape::layertree", ?key, "group added");
        Ok(key)
    }

    /// Adds a layer under `parent`.
    pub fn add_layer(&self, parent: NodeKey, layer: MapLayer) -> Result<NodeKey> {
        let mut storage = self.storage.write();
        Self::ensure_group(&storage, parent)?;
        let key = storage.nodes.insert(Node::layer(layer, parent));
        storage.nodes[parent].children.push(key);
        tracing::trace!(target: "fieldscape::layertree", ?key, "layer added");
        Ok(key)
    }

    /// Removes a node and its whole subtree.
    pub fn remove(&self, key: NodeKey) -> Result<()> {
        let mut storage = self.storage.write();
        if key == storage.root {
            return Err(LayerTreeError::RootNode);
        }
        let parent = storage
            .nodes
            .get(key)
            .ok_or(LayerTreeError::NodeNotFound)?
            .parent;
        if let Some(parent) = parent {
            if let Some(parent_node) = storage.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != key);
            }
        }
        for removed in storage.subtree_keys(key) {
            storage.nodes.remove(removed);
        }
        tracing::trace!(target: "fieldscape::layertree", ?key, "subtree removed");
        Ok(())
    }

    /// Removes every node except the root group.
    pub fn clear(&self) {
        let mut storage = self.storage.write();
        let root = storage.root;
        let top_level: Vec<NodeKey> = storage.nodes[root].children.drain(..).collect();
        for key in top_level {
            for removed in storage.subtree_keys(key) {
                storage.nodes.remove(removed);
            }
        }
    }

    /// The parent of a node; `None` for the root or unknown keys.
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.storage.read().nodes.get(key).and_then(|node| node.parent)
    }

    /// The children of a node, in order.
    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.storage
            .read()
            .nodes
            .get(key)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Number of children of a node.
    pub fn child_count(&self, key: NodeKey) -> usize {
        self.storage
            .read()
            .nodes
            .get(key)
            .map(|node| node.children.len())
            .unwrap_or(0)
    }

    /// Child of a node at the given row.
    pub fn child_at(&self, key: NodeKey, row: usize) -> Option<NodeKey> {
        self.storage
            .read()
            .nodes
            .get(key)?
            .children
            .get(row)
            .copied()
    }

    /// Row of a node within its parent's children.
    pub fn row_of(&self, key: NodeKey) -> Option<usize> {
        let storage = self.storage.read();
        let parent = storage.nodes.get(key)?.parent?;
        storage
            .nodes
            .get(parent)?
            .children
            .iter()
            .position(|&child| child == key)
    }

    /// Display name of a node (group name or layer name).
    pub fn name(&self, key: NodeKey) -> Option<String> {
        self.storage.read().nodes.get(key).map(|node| match &node.kind {
            NodeKind::Group { name } => name.clone(),
            NodeKind::Layer(layer) => layer.name().to_string(),
        })
    }

    // -------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------

    /// Visibility flag of a node. Unknown keys read as not visible.
    pub fn is_visible(&self, key: NodeKey) -> bool {
        self.storage
            .read()
            .nodes
            .get(key)
            .is_some_and(|node| node.visible)
    }

    /// Sets the visibility flag of a single node.
    pub fn set_visible(&self, key: NodeKey, visible: bool) {
        let mut storage = self.storage.write();
        if let Some(node) = storage.nodes.get_mut(key) {
            node.visible = visible;
        }
    }

    /// Sets the visibility flag of a node and every descendant.
    pub fn set_visible_recursive(&self, key: NodeKey, visible: bool) {
        let mut storage = self.storage.write();
        for member in storage.subtree_keys(key) {
            storage.nodes[member].visible = visible;
        }
    }

    // -------------------------------------------------------------------
    // Custom properties
    // -------------------------------------------------------------------

    /// Reads a custom property, falling back to `default` when the node or
    /// the property is missing.
    pub fn custom_property(&self, key: NodeKey, name: &str, default: &str) -> String {
        self.storage
            .read()
            .nodes
            .get(key)
            .and_then(|node| node.custom_properties.get(name).cloned())
            .unwrap_or_else(|| default.to_string())
    }

    /// Sets a custom property on a node.
    pub fn set_custom_property(&self, key: NodeKey, name: impl Into<String>, value: impl Into<String>) {
        let mut storage = self.storage.write();
        if let Some(node) = storage.nodes.get_mut(key) {
            node.custom_properties.insert(name.into(), value.into());
        }
    }

    /// Removes a custom property from a node.
    pub fn remove_custom_property(&self, key: NodeKey, name: &str) {
        let mut storage = self.storage.write();
        if let Some(node) = storage.nodes.get_mut(key) {
            node.custom_properties.remove(name);
        }
    }

    // -------------------------------------------------------------------
    // Layer access
    // -------------------------------------------------------------------

    /// The stable layer id, for layer nodes.
    pub fn layer_id(&self, key: NodeKey) -> Option<String> {
        self.storage.read().nodes.get(key).and_then(|node| match &node.kind {
            NodeKind::Layer(layer) => Some(layer.id().to_string()),
            NodeKind::Group { .. } => None,
        })
    }

    /// A non-owning handle to the vector dataset behind a layer node.
    ///
    /// `None` for groups, unknown keys, and layers over non-vector
    /// datasets.
    pub fn vector_layer(&self, key: NodeKey) -> Option<VectorLayerRef> {
        self.storage.read().nodes.get(key).and_then(|node| match &node.kind {
            NodeKind::Layer(layer) => layer.source().geometry().map(|geometry| VectorLayerRef {
                node: key,
                layer_id: layer.id().to_string(),
                geometry,
            }),
            NodeKind::Group { .. } => None,
        })
    }

    /// Number of legend entries of a layer node; 0 for anything else.
    pub fn legend_entry_count(&self, key: NodeKey) -> usize {
        self.storage
            .read()
            .nodes
            .get(key)
            .map(|node| match &node.kind {
                NodeKind::Layer(layer) => layer.legend().len(),
                NodeKind::Group { .. } => 0,
            })
            .unwrap_or(0)
    }

    /// Label of a layer's legend entry.
    pub fn legend_label(&self, key: NodeKey, entry: usize) -> Option<String> {
        self.storage.read().nodes.get(key).and_then(|node| match &node.kind {
            NodeKind::Layer(layer) => layer.legend().get(entry).map(|e| e.label.clone()),
            NodeKind::Group { .. } => None,
        })
    }

    /// Checked state of a layer's legend entry.
    pub fn legend_checked(&self, key: NodeKey, entry: usize) -> Option<CheckState> {
        self.storage.read().nodes.get(key).and_then(|node| match &node.kind {
            NodeKind::Layer(layer) => layer.legend().get(entry).map(|e| e.checked),
            NodeKind::Group { .. } => None,
        })
    }

    /// Sets the checked state of a layer's legend entry in place.
    ///
    /// Returns `true` when the entry existed.
    pub fn set_legend_checked(&self, key: NodeKey, entry: usize, checked: CheckState) -> bool {
        let mut storage = self.storage.write();
        let Some(node) = storage.nodes.get_mut(key) else {
            return false;
        };
        match &mut node.kind {
            NodeKind::Layer(layer) => match layer.legend_mut().get_mut(entry) {
                Some(legend_entry) => {
                    legend_entry.checked = checked;
                    true
                }
                None => false,
            },
            NodeKind::Group { .. } => false,
        }
    }

    /// Visits every layer node in preorder.
    pub fn visit_layers<F>(&self, mut f: F)
    where
        F: FnMut(NodeKey, &MapLayer),
    {
        let storage = self.storage.read();
        let mut stack = vec![storage.root];
        while let Some(key) = stack.pop() {
            if let Some(node) = storage.nodes.get(key) {
                if let NodeKind::Layer(layer) = &node.kind {
                    f(key, layer);
                }
                // push in reverse so children pop in order
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    fn ensure_group(storage: &TreeStorage, key: NodeKey) -> Result<()> {
        match storage.nodes.get(key) {
            Some(node) => match node.kind {
                NodeKind::Group { .. } => Ok(()),
                NodeKind::Layer(_) => Err(LayerTreeError::NotAGroup),
            },
            None => Err(LayerTreeError::NodeNotFound),
        }
    }
}

impl std::fmt::Debug for LayerTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.read();
        f.debug_struct("LayerTree")
            .field("nodes", &storage.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layertree::layer::{GeometryType, LayerSource};

    fn line_layer(id: &str) -> MapLayer {
        MapLayer::new(id, id.to_uppercase(), LayerSource::vector(GeometryType::Line))
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = LayerTree::new();
        let root = tree.root();
        assert!(tree.is_group(root));
        assert_eq!(tree.child_count(root), 0);
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_add_and_query_structure() {
        let tree = LayerTree::new();
        let group = tree.add_group(tree.root(), "Base").unwrap();
        let layer = tree.add_layer(group, line_layer("roads")).unwrap();

        assert!(tree.is_group(group));
        assert!(tree.is_layer(layer));
        assert_eq!(tree.children(tree.root()), vec![group]);
        assert_eq!(tree.child_at(group, 0), Some(layer));
        assert_eq!(tree.row_of(layer), Some(0));
        assert_eq!(tree.parent(layer), Some(group));
        assert_eq!(tree.name(group).as_deref(), Some("Base"));
        assert_eq!(tree.name(layer).as_deref(), Some("ROADS"));
    }

    #[test]
    fn test_layers_cannot_have_children() {
        let tree = LayerTree::new();
        let layer = tree.add_layer(tree.root(), line_layer("roads")).unwrap();
        assert_eq!(
            tree.add_group(layer, "sub").unwrap_err(),
            LayerTreeError::NotAGroup
        );
        assert_eq!(
            tree.add_layer(layer, line_layer("x")).unwrap_err(),
            LayerTreeError::NotAGroup
        );
    }

    #[test]
    fn test_remove_subtree() {
        let tree = LayerTree::new();
        let group = tree.add_group(tree.root(), "Base").unwrap();
        let layer = tree.add_layer(group, line_layer("roads")).unwrap();

        tree.remove(group).unwrap();
        assert!(!tree.contains(group));
        assert!(!tree.contains(layer));
        assert_eq!(tree.child_count(tree.root()), 0);

        assert_eq!(tree.remove(group).unwrap_err(), LayerTreeError::NodeNotFound);
        assert_eq!(tree.remove(tree.root()).unwrap_err(), LayerTreeError::RootNode);
    }

    #[test]
    fn test_visibility_recursive() {
        let tree = LayerTree::new();
        let group = tree.add_group(tree.root(), "Base").unwrap();
        let sub = tree.add_group(group, "Sub").unwrap();
        let layer = tree.add_layer(sub, line_layer("roads")).unwrap();

        assert!(tree.is_visible(group));
        tree.set_visible_recursive(group, false);
        assert!(!tree.is_visible(group));
        assert!(!tree.is_visible(sub));
        assert!(!tree.is_visible(layer));

        tree.set_visible(sub, true);
        assert!(tree.is_visible(sub));
        assert!(!tree.is_visible(layer));
    }

    #[test]
    fn test_custom_property_default() {
        let tree = LayerTree::new();
        let layer = tree.add_layer(tree.root(), line_layer("roads")).unwrap();

        assert_eq!(tree.custom_property(layer, NODE_HIDDEN_PROPERTY, "false"), "false");
        tree.set_custom_property(layer, NODE_HIDDEN_PROPERTY, "true");
        assert_eq!(tree.custom_property(layer, NODE_HIDDEN_PROPERTY, "false"), "true");
        tree.remove_custom_property(layer, NODE_HIDDEN_PROPERTY);
        assert_eq!(tree.custom_property(layer, NODE_HIDDEN_PROPERTY, "false"), "false");
    }

    #[test]
    fn test_vector_layer_handle() {
        let tree = LayerTree::new();
        let group = tree.add_group(tree.root(), "Base").unwrap();
        let roads = tree.add_layer(group, line_layer("roads")).unwrap();
        let ortho = tree
            .add_layer(group, MapLayer::new("ortho", "Ortho", LayerSource::Raster))
            .unwrap();

        let handle = tree.vector_layer(roads).unwrap();
        assert_eq!(handle.layer_id, "roads");
        assert_eq!(handle.geometry, GeometryType::Line);
        assert_eq!(handle.node, roads);

        assert!(tree.vector_layer(ortho).is_none());
        assert!(tree.vector_layer(group).is_none());
    }

    #[test]
    fn test_legend_entries() {
        let tree = LayerTree::new();
        let layer = tree
            .add_layer(
                tree.root(),
                line_layer("roads").with_legend_entry("Highway").with_legend_entry("Street"),
            )
            .unwrap();

        assert_eq!(tree.legend_entry_count(layer), 2);
        assert_eq!(tree.legend_label(layer, 0).as_deref(), Some("Highway"));
        assert_eq!(tree.legend_checked(layer, 1), Some(CheckState::Checked));

        assert!(tree.set_legend_checked(layer, 1, CheckState::Unchecked));
        assert_eq!(tree.legend_checked(layer, 1), Some(CheckState::Unchecked));
        assert!(!tree.set_legend_checked(layer, 5, CheckState::Checked));
    }

    #[test]
    fn test_visit_layers_preorder() {
        let tree = LayerTree::new();
        let a = tree.add_group(tree.root(), "A").unwrap();
        tree.add_layer(a, line_layer("first")).unwrap();
        tree.add_layer(tree.root(), line_layer("second")).unwrap();

        let mut ids = Vec::new();
        tree.visit_layers(|_, layer| ids.push(layer.id().to_string()));
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_clear() {
        let tree = LayerTree::new();
        let group = tree.add_group(tree.root(), "Base").unwrap();
        tree.add_layer(group, line_layer("roads")).unwrap();

        tree.clear();
        assert_eq!(tree.child_count(tree.root()), 0);
        assert!(!tree.contains(group));
        assert!(tree.is_group(tree.root()));
    }
}
