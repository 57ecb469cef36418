//! End-to-end scenarios for the layer tree proxy: a view-layer's-eye walk
//! through a small project with groups, vector and raster layers, legend
//! symbology, hidden nodes, map themes and tracking.

use std::sync::Arc;

use parking_lot::Mutex;

use fieldscape::prelude::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Scenario {
    proxy: LayerTreeProxy,
    base: NodeKey,
    roads: NodeKey,
    ortho: NodeKey,
    wells: NodeKey,
    parcels: NodeKey,
}

/// root
/// └─ Base (group)
///    ├─ roads   (vector line, legend: Highway, Street)
///    ├─ ortho   (raster)
///    ├─ wells   (vector point)
///    └─ parcels (vector polygon)
fn scenario() -> Scenario {
    init_logging();

    let tree = Arc::new(LayerTree::new());
    let base = tree.add_group(tree.root(), "Base").unwrap();
    let roads = tree
        .add_layer(
            base,
            MapLayer::new("L1", "Roads", LayerSource::vector(GeometryType::Line))
                .with_legend_entry("Highway")
                .with_legend_entry("Street"),
        )
        .unwrap();
    let ortho = tree
        .add_layer(base, MapLayer::new("L2", "Ortho", LayerSource::Raster))
        .unwrap();
    let wells = tree
        .add_layer(
            base,
            MapLayer::new("L3", "Wells", LayerSource::vector(GeometryType::Point)),
        )
        .unwrap();
    let parcels = tree
        .add_layer(
            base,
            MapLayer::new("L4", "Parcels", LayerSource::vector(GeometryType::Polygon)),
        )
        .unwrap();

    let proxy = LayerTreeProxy::new(tree, Arc::new(Project::new()));
    Scenario {
        proxy,
        base,
        roads,
        ortho,
        wells,
        parcels,
    }
}

fn index_of(proxy: &LayerTreeProxy, key: NodeKey) -> ModelIndex {
    proxy.map_from_source(&proxy.layer_tree_model().index_of_node(key))
}

#[test]
fn role_matrix_matches_node_kinds() {
    let s = scenario();

    // group: nothing layer-like about it
    let base = index_of(&s.proxy, s.base);
    assert_eq!(s.proxy.data(&base, LayerTreeRole::NodeType).as_str(), Some("group"));
    assert_eq!(s.proxy.data(&base, LayerTreeRole::Trackable), ItemData::Bool(false));
    assert_eq!(s.proxy.data(&base, LayerTreeRole::InTracking), ItemData::Bool(false));
    assert!(s.proxy.data(&base, LayerTreeRole::VectorLayer).is_none());

    // raster layer: a layer, but no vector dataset
    let ortho = index_of(&s.proxy, s.ortho);
    assert_eq!(s.proxy.data(&ortho, LayerTreeRole::NodeType).as_str(), Some("layer"));
    assert_eq!(s.proxy.data(&ortho, LayerTreeRole::Trackable), ItemData::Bool(false));
    assert!(s.proxy.data(&ortho, LayerTreeRole::VectorLayer).is_none());

    // geometry decides trackability
    for (key, trackable) in [(s.roads, true), (s.parcels, true), (s.wells, false)] {
        let index = index_of(&s.proxy, key);
        assert_eq!(
            s.proxy.data(&index, LayerTreeRole::Trackable),
            ItemData::Bool(trackable)
        );
    }

    // vector layers hand out a dataset reference
    let roads = index_of(&s.proxy, s.roads);
    let handle = s.proxy.data(&roads, LayerTreeRole::VectorLayer);
    let handle = handle.as_vector_layer().unwrap();
    assert_eq!(handle.layer_id, "L1");
    assert_eq!(handle.geometry, GeometryType::Line);
}

#[test]
fn legend_image_keys_are_stable_per_visual() {
    let s = scenario();

    let roads = index_of(&s.proxy, s.roads);
    let highway = s.proxy.index(0, 0, &roads);

    assert_eq!(
        s.proxy.data(&highway, LayerTreeRole::LegendImage).as_str(),
        Some("legend/L1/Highway")
    );
    assert_eq!(
        s.proxy.data(&roads, LayerTreeRole::LegendImage).as_str(),
        Some("layer/L1")
    );
    assert_eq!(
        s.proxy
            .data(&index_of(&s.proxy, s.base), LayerTreeRole::LegendImage)
            .as_str(),
        Some("")
    );

    // refreshing the same state yields the same key
    let again = s.proxy.index(0, 0, &index_of(&s.proxy, s.roads));
    assert_eq!(
        s.proxy.data(&again, LayerTreeRole::LegendImage),
        s.proxy.data(&highway, LayerTreeRole::LegendImage)
    );
}

#[test]
fn hidden_nodes_disappear_from_the_filtered_view() {
    let s = scenario();
    let tree = s.proxy.layer_tree().clone();

    let base = index_of(&s.proxy, s.base);
    let source_base = s.proxy.map_to_source(&base);
    let source_count = s.proxy.layer_tree_model().row_count(&source_base);
    assert_eq!(s.proxy.row_count(&base), source_count);

    tree.set_custom_property(s.wells, NODE_HIDDEN_PROPERTY, "true");
    s.proxy.invalidate();

    assert_eq!(s.proxy.row_count(&base), source_count - 1);
    for row in 0..s.proxy.row_count(&base) {
        let index = s.proxy.index(row, 0, &base);
        let name = s.proxy.display_text(&index).unwrap();
        assert_ne!(name, "Wells");
    }
    assert!(!index_of(&s.proxy, s.wells).is_valid());

    // a layer without the property stays visible (missing reads as "false")
    assert!(index_of(&s.proxy, s.roads).is_valid());
}

#[test]
fn visibility_writes_cascade_and_notify() {
    let s = scenario();
    let tree = s.proxy.layer_tree().clone();
    let changes = Arc::new(Mutex::new(Vec::new()));

    let recv = changes.clone();
    s.proxy.signals().data_changed.connect(move |(index, _, roles)| {
        recv.lock().push((index.row(), roles.clone()));
    });

    // unchecking the group reaches every descendant layer
    let base = index_of(&s.proxy, s.base);
    assert!(s.proxy.set_data(&base, ItemData::Bool(false), LayerTreeRole::Visible));
    for key in [s.base, s.roads, s.ortho, s.wells, s.parcels] {
        assert!(!tree.is_visible(key));
    }
    assert_eq!(s.proxy.data(&base, LayerTreeRole::Visible), ItemData::Bool(false));

    // a legend entry write flips only the entry's checked state
    assert!(tree.legend_checked(s.roads, 0).unwrap().is_checked());
    let roads = index_of(&s.proxy, s.roads);
    let highway = s.proxy.index(0, 0, &roads);
    assert!(s.proxy.set_data(&highway, ItemData::Bool(false), LayerTreeRole::Visible));
    assert_eq!(tree.legend_checked(s.roads, 0), Some(CheckState::Unchecked));
    assert_eq!(tree.legend_checked(s.roads, 1), Some(CheckState::Checked));
    assert_eq!(s.proxy.data(&highway, LayerTreeRole::Visible), ItemData::Bool(false));

    // only the Visible role is writable
    assert!(!s.proxy.set_data(&roads, ItemData::Bool(true), LayerTreeRole::Trackable));

    // both successful writes notified synchronously
    let changes = changes.lock();
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|(_, roles)| roles == &vec![LayerTreeRole::Visible]));
}

#[test]
fn tracking_set_semantics() {
    let s = scenario();
    let notified = Arc::new(Mutex::new(0));

    let n = notified.clone();
    s.proxy.signals().data_changed.connect(move |(_, _, roles)| {
        if roles.contains(&LayerTreeRole::InTracking) {
            *n.lock() += 1;
        }
    });

    let parcels = index_of(&s.proxy, s.parcels);
    let before = s.proxy.tracked_layers().len();

    // idempotent enable
    s.proxy.set_layer_in_tracking(s.parcels, true);
    s.proxy.set_layer_in_tracking(s.parcels, true);
    assert_eq!(s.proxy.tracked_layers(), vec![s.parcels]);
    assert_eq!(s.proxy.data(&parcels, LayerTreeRole::InTracking), ItemData::Bool(true));

    // round trip back to the initial state
    s.proxy.set_layer_in_tracking(s.parcels, false);
    assert_eq!(s.proxy.tracked_layers().len(), before);
    assert_eq!(s.proxy.data(&parcels, LayerTreeRole::InTracking), ItemData::Bool(false));

    // every call notified, membership change or not
    assert_eq!(*notified.lock(), 3);

    // tracking is orthogonal to visibility
    assert!(s.proxy.layer_tree().is_visible(s.parcels));
}

#[test]
fn tracking_a_filtered_out_layer_stays_silent() {
    let s = scenario();
    s.proxy
        .layer_tree()
        .set_custom_property(s.parcels, NODE_HIDDEN_PROPERTY, "true");

    let notified = Arc::new(Mutex::new(0));
    let n = notified.clone();
    s.proxy.signals().data_changed.connect(move |_| *n.lock() += 1);

    s.proxy.set_layer_in_tracking(s.parcels, true);
    assert_eq!(s.proxy.tracked_layers(), vec![s.parcels]);
    assert_eq!(*notified.lock(), 0);
}

#[test]
fn map_theme_resolution() {
    let s = scenario();
    let tree = s.proxy.layer_tree().clone();
    let themes = s.proxy.project().map_theme_collection();

    // no persisted themes: recomputation leaves the name empty
    s.proxy.set_map_theme("Leftover");
    s.proxy.update_current_map_theme();
    assert_eq!(s.proxy.map_theme(), "");

    // persist two themes; make the current state match the second
    themes.insert(
        "All on",
        MapThemeRecord::from_records(vec![
            ThemeLayerRecord::new("L1", true),
            ThemeLayerRecord::new("L2", true),
            ThemeLayerRecord::new("L3", true),
            ThemeLayerRecord::new("L4", true),
        ]),
    );
    themes.insert(
        "Survey",
        MapThemeRecord::new()
            .with_layer("L4", true)
            .with_layer("L3", true)
            .with_layer("L2", false)
            .with_layer("L1", true),
    );

    tree.set_visible(s.ortho, false);
    s.proxy.update_current_map_theme();
    // order of layer records does not matter, visibility does
    assert_eq!(s.proxy.map_theme(), "Survey");

    tree.set_visible(s.ortho, true);
    s.proxy.update_current_map_theme();
    assert_eq!(s.proxy.map_theme(), "All on");

    // a configuration matching nothing clears the name
    tree.set_visible(s.roads, false);
    tree.set_visible(s.wells, false);
    s.proxy.update_current_map_theme();
    assert_eq!(s.proxy.map_theme(), "");
}

#[test]
fn map_theme_setter_signals_once_per_change() {
    let s = scenario();
    let emitted = Arc::new(Mutex::new(Vec::new()));

    let recv = emitted.clone();
    s.proxy.map_theme_changed.connect(move |name| recv.lock().push(name.clone()));

    s.proxy.set_map_theme("Survey");
    s.proxy.set_map_theme("Survey");
    assert_eq!(*emitted.lock(), vec!["Survey"]);
}

#[test]
fn proxy_works_as_a_plain_item_model() {
    let s = scenario();

    // structural queries through the trait object surface
    let model: &dyn ItemModel = &s.proxy;
    assert_eq!(model.row_count(&ModelIndex::invalid()), 1);

    let base = model.index(0, 0, &ModelIndex::invalid());
    assert_eq!(model.display_text(&base).as_deref(), Some("Base"));
    assert_eq!(model.row_count(&base), 4);
    assert_eq!(model.column_count(&base), 1);

    let roads = model.index(0, 0, &base);
    assert_eq!(model.parent(&roads), base);
    assert_eq!(model.check_state(&roads), Some(CheckState::Checked));
    // legend rows count as children of the layer
    assert!(model.has_children(&roads));

    // standard-role writes are rejected at the trait surface too
    assert!(!model.set_data(&roads, ItemData::Bool(false), ItemRole::CheckState));
}
