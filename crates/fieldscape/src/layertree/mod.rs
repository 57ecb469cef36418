//! The layer-tree stack: hierarchy, themes, source model, proxy.
//!
//! Dependency order, leaves first:
//!
//! 1. [`LayerTree`]: the hierarchy of groups and [`MapLayer`]s, owning
//!    every node and legend entry
//! 2. [`MapThemeCollection`] / [`Project`]: named per-layer visibility
//!    snapshots to resolve the active theme against
//! 3. [`LayerTreeModel`]: the raw `ItemModel` over a hierarchy, including
//!    legend rows
//! 4. [`LayerTreeProxy`]: the filtering, role-augmenting view a display
//!    layer binds to
//!
//! A typical setup:
//!
//! ```
//! use std::sync::Arc;
//! use fieldscape::layertree::{GeometryType, LayerSource, LayerTree, LayerTreeProxy, MapLayer, Project};
//! use fieldscape::model::{ItemModel, LayerTreeRole, ModelIndex};
//!
//! let tree = Arc::new(LayerTree::new());
//! let group = tree.add_group(tree.root(), "Base").unwrap();
//! tree.add_layer(
//!     group,
//!     MapLayer::new("roads", "Roads", LayerSource::vector(GeometryType::Line)),
//! )
//! .unwrap();
//!
//! let proxy = LayerTreeProxy::new(tree, Arc::new(Project::new()));
//! let base = proxy.index(0, 0, &ModelIndex::invalid());
//! assert_eq!(proxy.data(&base, LayerTreeRole::NodeType).as_str(), Some("group"));
//! ```

mod layer;
mod node;
mod proxy;
mod theme;
mod tree_model;

pub use layer::{GeometryType, LayerSource, LegendEntry, MapLayer, NodeKey, VectorLayerRef};
pub use node::{LayerTree, LayerTreeError, NODE_HIDDEN_PROPERTY};
pub use proxy::LayerTreeProxy;
pub use theme::{MapThemeCollection, MapThemeRecord, Project, ThemeLayerRecord};
pub use tree_model::{LayerTreeModel, LegendRef};
