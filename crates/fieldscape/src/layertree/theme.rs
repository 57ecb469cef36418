//! Map themes: named snapshots of per-layer visibility.
//!
//! A [`MapThemeRecord`] captures which layers of a project are visible. The
//! project's [`MapThemeCollection`] keeps the persisted records by name;
//! [`MapThemeRecord::from_current_state`] materializes a transient record
//! from a hierarchy so the two sides can be compared.
//!
//! Comparison deliberately looks at per-layer visibility only: layer
//! ordering and legend collapse state are display details a theme match
//! should not depend on.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::node::LayerTree;

/// Visibility of one layer within a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLayerRecord {
    /// The stable layer id.
    pub layer_id: String,
    /// Whether the layer is visible in this theme.
    pub visible: bool,
}

impl ThemeLayerRecord {
    /// Creates a record for one layer.
    pub fn new(layer_id: impl Into<String>, visible: bool) -> Self {
        Self {
            layer_id: layer_id.into(),
            visible,
        }
    }
}

/// A snapshot of per-layer visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapThemeRecord {
    layer_records: Vec<ThemeLayerRecord>,
}

impl MapThemeRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from explicit layer records.
    pub fn from_records(layer_records: Vec<ThemeLayerRecord>) -> Self {
        Self { layer_records }
    }

    /// Adds a layer record, builder style.
    pub fn with_layer(mut self, layer_id: impl Into<String>, visible: bool) -> Self {
        self.layer_records.push(ThemeLayerRecord::new(layer_id, visible));
        self
    }

    /// Materializes the record describing the hierarchy's current state:
    /// one entry per layer node, carrying that node's visibility flag.
    pub fn from_current_state(tree: &LayerTree) -> Self {
        let mut record = Self::new();
        tree.visit_layers(|key, layer| {
            record
                .layer_records
                .push(ThemeLayerRecord::new(layer.id(), tree.is_visible(key)));
        });
        record
    }

    /// The layer records, in capture order.
    pub fn layer_records(&self) -> &[ThemeLayerRecord] {
        &self.layer_records
    }

    /// The per-layer visibility as an id-keyed map.
    pub fn layer_visibilities(&self) -> BTreeMap<&str, bool> {
        self.layer_records
            .iter()
            .map(|record| (record.layer_id.as_str(), record.visible))
            .collect()
    }

    /// Order-insensitive comparison of per-layer visibility.
    ///
    /// Only layer ids and their visible flags participate; record order
    /// does not.
    pub fn matches_layers(&self, other: &Self) -> bool {
        self.layer_visibilities() == other.layer_visibilities()
    }
}

/// The persisted, named themes of a project.
///
/// Themes keep their insertion order; consumers scanning for a match see
/// them in that order, so ties resolve deterministically to the
/// first-inserted theme.
#[derive(Debug, Default)]
pub struct MapThemeCollection {
    themes: RwLock<Vec<(String, MapThemeRecord)>>,
}

impl MapThemeCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a theme, replacing any existing theme of the same name in
    /// place (its position in the enumeration order is kept).
    pub fn insert(&self, name: impl Into<String>, record: MapThemeRecord) {
        let name = name.into();
        let mut themes = self.themes.write();
        match themes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing_record)) => *existing_record = record,
            None => themes.push((name, record)),
        }
    }

    /// Removes a theme by name. Returns `true` if it existed.
    pub fn remove(&self, name: &str) -> bool {
        let mut themes = self.themes.write();
        let before = themes.len();
        themes.retain(|(existing, _)| existing != name);
        themes.len() != before
    }

    /// The theme names, in enumeration order.
    pub fn map_themes(&self) -> Vec<String> {
        self.themes.read().iter().map(|(name, _)| name.clone()).collect()
    }

    /// The persisted record of a theme.
    pub fn map_theme_state(&self, name: &str) -> Option<MapThemeRecord> {
        self.themes
            .read()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, record)| record.clone())
    }

    /// Returns `true` if a theme with this name exists.
    pub fn has_map_theme(&self, name: &str) -> bool {
        self.themes.read().iter().any(|(existing, _)| existing == name)
    }

    /// Number of persisted themes.
    pub fn len(&self) -> usize {
        self.themes.read().len()
    }

    /// Returns `true` if no themes are persisted.
    pub fn is_empty(&self) -> bool {
        self.themes.read().is_empty()
    }
}

/// The project context a layer-tree proxy works against.
///
/// Passed in explicitly at construction; there is no ambient project
/// instance to reach for.
#[derive(Debug, Default)]
pub struct Project {
    map_themes: MapThemeCollection,
}

impl Project {
    /// Creates a project with an empty theme collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The project's theme collection.
    pub fn map_theme_collection(&self) -> &MapThemeCollection {
        &self.map_themes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layertree::layer::{GeometryType, LayerSource, MapLayer};

    #[test]
    fn test_record_comparison_ignores_order() {
        let a = MapThemeRecord::new()
            .with_layer("roads", true)
            .with_layer("rivers", false);
        let b = MapThemeRecord::new()
            .with_layer("rivers", false)
            .with_layer("roads", true);
        let c = MapThemeRecord::new()
            .with_layer("rivers", true)
            .with_layer("roads", true);

        assert!(a.matches_layers(&b));
        assert!(!a.matches_layers(&c));
    }

    #[test]
    fn test_record_comparison_checks_layer_sets() {
        let a = MapThemeRecord::new().with_layer("roads", true);
        let b = MapThemeRecord::new()
            .with_layer("roads", true)
            .with_layer("rivers", true);
        assert!(!a.matches_layers(&b));
        assert!(a.matches_layers(&a.clone()));
    }

    #[test]
    fn test_from_current_state() {
        let tree = LayerTree::new();
        let group = tree.add_group(tree.root(), "Base").unwrap();
        let roads = tree
            .add_layer(group, MapLayer::new("roads", "Roads", LayerSource::vector(GeometryType::Line)))
            .unwrap();
        tree.add_layer(group, MapLayer::new("ortho", "Ortho", LayerSource::Raster))
            .unwrap();
        tree.set_visible(roads, false);

        let record = MapThemeRecord::from_current_state(&tree);
        let visibilities = record.layer_visibilities();
        assert_eq!(visibilities.len(), 2);
        assert_eq!(visibilities.get("roads"), Some(&false));
        assert_eq!(visibilities.get("ortho"), Some(&true));
    }

    #[test]
    fn test_collection_enumeration_order() {
        let collection = MapThemeCollection::new();
        collection.insert("Summer", MapThemeRecord::new().with_layer("roads", true));
        collection.insert("Winter", MapThemeRecord::new().with_layer("roads", false));

        assert_eq!(collection.map_themes(), vec!["Summer", "Winter"]);
        assert_eq!(collection.len(), 2);
        assert!(collection.has_map_theme("Winter"));
        assert!(!collection.has_map_theme("Spring"));
    }

    #[test]
    fn test_collection_insert_replaces_in_place() {
        let collection = MapThemeCollection::new();
        collection.insert("Summer", MapThemeRecord::new().with_layer("roads", true));
        collection.insert("Winter", MapThemeRecord::new());
        collection.insert("Summer", MapThemeRecord::new().with_layer("roads", false));

        assert_eq!(collection.map_themes(), vec!["Summer", "Winter"]);
        let record = collection.map_theme_state("Summer").unwrap();
        assert_eq!(record.layer_visibilities().get("roads"), Some(&false));
    }

    #[test]
    fn test_collection_remove() {
        let collection = MapThemeCollection::new();
        collection.insert("Summer", MapThemeRecord::new());
        assert!(collection.remove("Summer"));
        assert!(!collection.remove("Summer"));
        assert!(collection.is_empty());
    }
}
