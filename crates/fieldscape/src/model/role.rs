//! Data roles for item models.
//!
//! Roles define what type of data is being requested or set on a model
//! item. Each item can have multiple pieces of data associated with it,
//! distinguished by their role. Two role vocabularies exist:
//!
//! - [`ItemRole`]: the standard roles every source model understands
//!   (display text, checked state, and so on)
//! - [`LayerTreeRole`]: the layer-tree proxy's vocabulary, the six
//!   domain roles plus a pass-through case wrapping an `ItemRole`
//!
//! Representing roles as closed sum types (instead of raw role numbers)
//! keeps every dispatch over them exhaustively checked.

use crate::layertree::VectorLayerRef;

/// Standard roles for accessing different aspects of item data.
///
/// When querying data from a model via `ItemModel::data()`, the role
/// specifies what information is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Primary text to display. Should return `String`.
    Display,

    /// Icon or decoration key to show alongside the text. Should return
    /// `String`.
    Decoration,

    /// Tooltip text shown on hover. Should return `String`.
    ToolTip,

    /// Check state for checkable items. Should return `CheckState`.
    CheckState,

    /// Application-specific data.
    User(u32),
}

impl ItemRole {
    /// The stable binding name of this role, used by view layers to bind
    /// symbolically. User roles have no static name.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            ItemRole::Display => Some("display"),
            ItemRole::Decoration => Some("decoration"),
            ItemRole::ToolTip => Some("toolTip"),
            ItemRole::CheckState => Some("checkState"),
            ItemRole::User(_) => None,
        }
    }
}

/// The layer-tree proxy's role vocabulary.
///
/// One case per derived field the proxy adds on top of its source model,
/// plus [`LayerTreeRole::Item`] passing a standard role through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerTreeRole {
    /// The vector dataset behind a layer position, as a non-owning
    /// [`VectorLayerRef`] handle. No value for groups, legend entries and
    /// non-vector layers.
    VectorLayer,

    /// A stable string key for image-cache lookup of the rendered legend
    /// glyph: `legend/<layer id>/<entry label>` for legend entries,
    /// `layer/<layer id>` for layers, empty for groups.
    LegendImage,

    /// The kind of the position as a literal string: `"layer"`, `"group"`,
    /// or `"legend"` for anything that is neither.
    NodeType,

    /// Checked state of a legend entry, or the resolved node's visibility
    /// flag. The only writable role.
    Visible,

    /// Whether the position is a vector layer with line or polygon
    /// geometry, i.e. capable of entering tracking mode.
    Trackable,

    /// Whether the position is a layer currently in the tracking set.
    InTracking,

    /// A standard role, forwarded to the source model unmodified.
    Item(ItemRole),
}

impl LayerTreeRole {
    /// The stable binding name of this role.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            LayerTreeRole::VectorLayer => Some("VectorLayer"),
            LayerTreeRole::LegendImage => Some("legendImage"),
            LayerTreeRole::NodeType => Some("Type"),
            LayerTreeRole::Visible => Some("Visible"),
            LayerTreeRole::Trackable => Some("trackable"),
            LayerTreeRole::InTracking => Some("inTracking"),
            LayerTreeRole::Item(role) => role.name(),
        }
    }
}

impl From<ItemRole> for LayerTreeRole {
    fn from(role: ItemRole) -> Self {
        LayerTreeRole::Item(role)
    }
}

/// Check state for checkable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    /// Item is unchecked.
    #[default]
    Unchecked,
    /// Item is partially checked (for tri-state checkboxes).
    PartiallyChecked,
    /// Item is checked.
    Checked,
}

impl CheckState {
    /// The bool → tri-state translation used when writing the Visible role.
    pub fn from_bool(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    /// Returns `true` if the item is checked (fully or partially).
    ///
    /// This is the tri-state → bool reading used by the Visible role.
    pub fn is_checked(&self) -> bool {
        !matches!(self, CheckState::Unchecked)
    }

    /// Returns `true` if the item is fully checked.
    pub fn is_fully_checked(&self) -> bool {
        matches!(self, CheckState::Checked)
    }
}

/// Value container for item data.
///
/// `ItemData` holds whatever a role query produces. Absent data is
/// `ItemData::None`; every failure mode of a model read degrades to it.
///
/// # Example
///
/// ```
/// use fieldscape::model::ItemData;
///
/// let data = ItemData::from("Roads");
/// assert_eq!(data.as_str(), Some("Roads"));
/// assert!(data.as_bool().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemData {
    /// No data.
    #[default]
    None,
    /// String data (for Display, ToolTip, legend image keys).
    String(String),
    /// Integer data.
    Int(i64),
    /// Boolean data (Visible, Trackable, InTracking).
    Bool(bool),
    /// Check state data.
    CheckState(CheckState),
    /// A non-owning handle to a vector layer.
    VectorLayer(VectorLayerRef),
}

impl ItemData {
    /// Returns `true` if this is `ItemData::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    /// Returns `true` if this contains some data.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Attempts to get the data as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the data as an owned string.
    pub fn into_string(self) -> Option<String> {
        match self {
            ItemData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get the data as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ItemData::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the data as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ItemData::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the data as a check state.
    pub fn as_check_state(&self) -> Option<CheckState> {
        match self {
            ItemData::CheckState(s) => Some(*s),
            _ => None,
        }
    }

    /// Attempts to get the data as a vector-layer handle.
    pub fn as_vector_layer(&self) -> Option<&VectorLayerRef> {
        match self {
            ItemData::VectorLayer(layer) => Some(layer),
            _ => None,
        }
    }

    /// Reads the data as a boolean the way a checkbox binding would:
    /// `Bool` directly, `CheckState` through its checked reading, anything
    /// else `false`.
    pub fn to_checked(&self) -> bool {
        match self {
            ItemData::Bool(b) => *b,
            ItemData::CheckState(s) => s.is_checked(),
            _ => false,
        }
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<&str> for ItemData {
    fn from(s: &str) -> Self {
        ItemData::String(s.to_string())
    }
}

impl From<i64> for ItemData {
    fn from(n: i64) -> Self {
        ItemData::Int(n)
    }
}

impl From<bool> for ItemData {
    fn from(b: bool) -> Self {
        ItemData::Bool(b)
    }
}

impl From<CheckState> for ItemData {
    fn from(s: CheckState) -> Self {
        ItemData::CheckState(s)
    }
}

impl From<VectorLayerRef> for ItemData {
    fn from(layer: VectorLayerRef) -> Self {
        ItemData::VectorLayer(layer)
    }
}

impl From<Option<String>> for ItemData {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => ItemData::String(s),
            None => ItemData::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(ItemRole::Display.name(), Some("display"));
        assert_eq!(ItemRole::User(3).name(), None);
        assert_eq!(LayerTreeRole::Trackable.name(), Some("trackable"));
        assert_eq!(LayerTreeRole::NodeType.name(), Some("Type"));
        assert_eq!(
            LayerTreeRole::Item(ItemRole::CheckState).name(),
            Some("checkState")
        );
    }

    #[test]
    fn test_check_state_bool_round_trip() {
        assert_eq!(CheckState::from_bool(true), CheckState::Checked);
        assert_eq!(CheckState::from_bool(false), CheckState::Unchecked);
        assert!(CheckState::Checked.is_checked());
        assert!(CheckState::PartiallyChecked.is_checked());
        assert!(!CheckState::Unchecked.is_checked());
        assert!(!CheckState::PartiallyChecked.is_fully_checked());
    }

    #[test]
    fn test_item_data_accessors() {
        let data = ItemData::from("hello");
        assert_eq!(data.as_str(), Some("hello"));
        assert!(data.as_int().is_none());
        assert!(data.is_some());

        assert!(ItemData::None.is_none());
        assert_eq!(ItemData::from(true).as_bool(), Some(true));
        assert_eq!(ItemData::from(7i64).as_int(), Some(7));
    }

    #[test]
    fn test_to_checked() {
        assert!(ItemData::Bool(true).to_checked());
        assert!(!ItemData::Bool(false).to_checked());
        assert!(ItemData::CheckState(CheckState::PartiallyChecked).to_checked());
        assert!(!ItemData::CheckState(CheckState::Unchecked).to_checked());
        assert!(!ItemData::None.to_checked());
        assert!(!ItemData::from("true").to_checked());
    }
}
