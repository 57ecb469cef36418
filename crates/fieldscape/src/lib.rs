//! Fieldscape: presentation models for geospatial layer trees.
//!
//! Fieldscape gives a map application's display layer a filtered,
//! role-augmented view over a hierarchy of map layers and groups:
//!
//! - [`layertree::LayerTree`]: the hierarchy of groups, layers, legend
//!   symbology, visibility flags, custom properties
//! - [`layertree::LayerTreeModel`]: the raw tree model over a hierarchy
//! - [`layertree::LayerTreeProxy`]: the model a view binds to; hides rows
//!   flagged hidden, derives per-row fields (vector dataset, legend image
//!   keys, trackability), and tracks the active map theme and the layers in
//!   location-tracking mode
//! - [`model`]: the model/view vocabulary (`ModelIndex`, roles,
//!   `ItemModel`, `ModelSignals`)
//!
//! The reactive primitives ([`Signal`], [`Property`]) come from
//! `fieldscape-core` and are re-exported here. Everything is synchronous
//! and intended for a single UI-bound thread of control.

pub use fieldscape_core::*;

pub mod layertree;
pub mod logging;
pub mod model;
pub mod prelude;
