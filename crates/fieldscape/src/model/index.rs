//! Model index for addressing items in hierarchical models.
//!
//! The `ModelIndex` type is the fundamental way to reference items within
//! an `ItemModel`. It contains row, column, and parent information to
//! uniquely identify any item in a hierarchical data structure.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// A global counter for generating unique internal IDs.
static INTERNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Represents a position within an `ItemModel`.
///
/// Each index contains:
/// - Row and column within the parent
/// - A reference to the parent index (for hierarchical models)
/// - An internal ID for model-specific identification (the layer-tree
///   models store the hierarchy node key here)
///
/// # Index Validity
///
/// Model indices should be used immediately and not stored long-term.
/// After model modifications (insertions, deletions), previously obtained
/// indices may become invalid. The invalid index doubles as the parent
/// reference for root-level items.
#[derive(Clone)]
pub struct ModelIndex {
    /// The row within the parent.
    row: usize,
    /// The column within the parent.
    column: usize,
    /// The parent index. `None` indicates a root-level item.
    parent: Option<Box<ModelIndex>>,
    /// An internal ID that models can use for their own purposes.
    internal_id: u64,
    /// Whether this index is valid.
    valid: bool,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    /// Creates an invalid (null) model index.
    ///
    /// An invalid index is used to represent:
    /// - The root of the model (as a parent reference)
    /// - A non-existent or out-of-bounds item
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            internal_id: 0,
            valid: false,
        }
    }

    /// Creates a new valid model index with a generated internal ID.
    #[inline]
    pub fn new(row: usize, column: usize, parent: ModelIndex) -> Self {
        let internal_id = INTERNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::build(row, column, parent, internal_id)
    }

    /// Creates a new valid model index with a custom internal ID.
    ///
    /// Models use the internal ID to store an identifier into their own
    /// storage for efficient lookups.
    #[inline]
    pub fn with_internal_id(
        row: usize,
        column: usize,
        parent: ModelIndex,
        internal_id: u64,
    ) -> Self {
        Self::build(row, column, parent, internal_id)
    }

    fn build(row: usize, column: usize, parent: ModelIndex, internal_id: u64) -> Self {
        Self {
            row,
            column,
            parent: if parent.is_valid() {
                Some(Box::new(parent))
            } else {
                None
            },
            internal_id,
            valid: true,
        }
    }

    /// Returns `true` if this is a valid index.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the row of this index within its parent.
    ///
    /// Returns 0 for invalid indices.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the column of this index within its parent.
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the parent index, or an invalid index for root-level items.
    #[inline]
    pub fn parent(&self) -> ModelIndex {
        match &self.parent {
            Some(parent) => (**parent).clone(),
            None => ModelIndex::invalid(),
        }
    }

    /// Returns `true` if this index has a valid parent.
    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the internal ID associated with this index.
    #[inline]
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Returns the depth of this index in the tree hierarchy.
    ///
    /// Root-level items have depth 0. Returns 0 for invalid indices.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while current.is_valid() {
            depth += 1;
            current = current.parent();
        }
        depth
    }
}

impl std::fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            f.debug_struct("ModelIndex")
                .field("row", &self.row)
                .field("column", &self.column)
                .field("depth", &self.depth())
                .field("internal_id", &self.internal_id)
                .finish()
        } else {
            write!(f, "ModelIndex(invalid)")
        }
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        // Two invalid indices are equal
        if !self.is_valid() && !other.is_valid() {
            return true;
        }
        if self.is_valid() != other.is_valid() {
            return false;
        }
        self.row == other.row
            && self.column == other.column
            && self.internal_id == other.internal_id
            && self.parent == other.parent
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            self.internal_id.hash(state);
        }
    }
}
