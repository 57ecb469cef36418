//! Model/View vocabulary for Fieldscape.
//!
//! This module provides the types through which a display layer consumes
//! hierarchical data without knowing its underlying structure:
//!
//! - `ModelIndex`: Identifies an item's position in a model
//! - `ItemRole` / `LayerTreeRole`: Specify what field of an item to access
//! - `ItemData`: Value container for item data
//! - `ItemModel`: The trait that models implement
//! - `ModelSignals`: Signals for change notifications
//!
//! The concrete models live in [`crate::layertree`]: `LayerTreeModel`
//! exposes the raw layer hierarchy, and `LayerTreeProxy` sits above it
//! adding the domain roles and the hidden-row filter.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │  LayerTreeModel  │────>│  LayerTreeProxy  │────>│    View     │
//! │   (ItemModel)    │     │   (ItemModel)    │     │             │
//! └──────────────────┘     └──────────────────┘     └─────────────┘
//!          │                        │
//!          │     ┌────────────┐     │
//!          └────>│ ModelIndex │<────┘
//!                │  ItemData  │
//!                └────────────┘
//! ```
//!
//! Views query models using `ModelIndex` and a role to get `ItemData`.
//! Models emit signals when data changes, which views listen to for
//! updates; every emission is synchronous.

mod index;
mod role;
mod traits;

pub use index::ModelIndex;
pub use role::{CheckState, ItemData, ItemRole, LayerTreeRole};
pub use traits::{ItemModel, ModelSignals};
