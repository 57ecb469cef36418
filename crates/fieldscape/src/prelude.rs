//! Prelude module for Fieldscape.
//!
//! Re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use fieldscape::prelude::*;
//! ```

// ============================================================================
// Signal/Slot and Property System
// ============================================================================

pub use fieldscape_core::{ConnectionGuard, ConnectionId, Property, Signal};

// ============================================================================
// Model/View Vocabulary
// ============================================================================

pub use crate::model::{
    CheckState, ItemData, ItemModel, ItemRole, LayerTreeRole, ModelIndex, ModelSignals,
};

// ============================================================================
// Layer Tree
// ============================================================================

pub use crate::layertree::{
    GeometryType, LayerSource, LayerTree, LayerTreeError, LayerTreeModel, LayerTreeProxy,
    LegendEntry, LegendRef, MapLayer, MapThemeCollection, MapThemeRecord, NodeKey, Project,
    ThemeLayerRecord, VectorLayerRef, NODE_HIDDEN_PROPERTY,
};
