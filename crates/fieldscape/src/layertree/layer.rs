//! Map layers and their legend symbology.
//!
//! A [`MapLayer`] describes the dataset a layer node presents: a stable
//! identifier, a display name, the dataset kind, and the legend entries its
//! symbology produces. Layers are owned by the [`crate::layertree::LayerTree`]
//! that holds their node; everything outside the tree refers to them through
//! [`NodeKey`] handles or the non-owning [`VectorLayerRef`].

use slotmap::new_key_type;

use crate::model::CheckState;

new_key_type! {
    /// Handle to a node in a [`crate::layertree::LayerTree`].
    ///
    /// Keys are stable for the lifetime of the node and never dangle into
    /// foreign memory: resolving a key for a removed node simply yields
    /// nothing.
    pub struct NodeKey;
}

/// Geometry classification of a vector dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    /// Point features.
    Point,
    /// Line features.
    Line,
    /// Polygon features.
    Polygon,
    /// Geometry could not be determined.
    Unknown,
}

/// The dataset kind behind a map layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    /// A vector dataset with a geometry classification.
    Vector {
        /// Geometry classification of the features.
        geometry: GeometryType,
    },
    /// A raster (or otherwise non-vector) dataset.
    Raster,
}

impl LayerSource {
    /// Shorthand for a vector source.
    pub fn vector(geometry: GeometryType) -> Self {
        LayerSource::Vector { geometry }
    }

    /// Returns `true` for vector datasets.
    pub fn is_vector(&self) -> bool {
        matches!(self, LayerSource::Vector { .. })
    }

    /// The geometry classification, for vector datasets.
    pub fn geometry(&self) -> Option<GeometryType> {
        match self {
            LayerSource::Vector { geometry } => Some(*geometry),
            LayerSource::Raster => None,
        }
    }
}

/// A symbology entry in a layer's legend.
///
/// Legend entries belong to the layer whose symbology they summarize; a
/// tree position with a legend entry is distinct from the layer node
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Display label of the symbology category.
    pub label: String,
    /// Checked (shown) state of this category.
    pub checked: CheckState,
}

impl LegendEntry {
    /// Creates a checked legend entry with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: CheckState::Checked,
        }
    }
}

/// A map layer: a stable id, a display name, the dataset behind it, and
/// its legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayer {
    id: String,
    name: String,
    source: LayerSource,
    legend: Vec<LegendEntry>,
}

impl MapLayer {
    /// Creates a layer over the given dataset.
    ///
    /// The id must be unique within a project; it keys legend image caches
    /// and theme records.
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: LayerSource) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source,
            legend: Vec::new(),
        }
    }

    /// Adds a legend entry, builder style.
    pub fn with_legend_entry(mut self, label: impl Into<String>) -> Self {
        self.legend.push(LegendEntry::new(label));
        self
    }

    /// The stable layer id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dataset behind this layer.
    pub fn source(&self) -> &LayerSource {
        &self.source
    }

    /// The legend entries of this layer's symbology.
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    pub(crate) fn legend_mut(&mut self) -> &mut [LegendEntry] {
        &mut self.legend
    }
}

/// A non-owning reference to a vector layer.
///
/// This is what the `VectorLayer` role hands to the view: enough to
/// identify and classify the dataset without aliasing the tree's storage.
/// Dropping the handle never affects the layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorLayerRef {
    /// Node of the layer inside its tree.
    pub node: NodeKey,
    /// The stable layer id.
    pub layer_id: String,
    /// Geometry classification of the dataset.
    pub geometry: GeometryType,
}
