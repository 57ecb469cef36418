//! Reactive property cells.
//!
//! A [`Property<T>`] wraps a value and detects changes: `set()` compares the
//! new value with the current one and reports whether anything actually
//! changed. The owner pairs a property with a [`crate::Signal`] and emits it
//! only when `set` returns `true`, so observers never see redundant
//! notifications.
//!
//! ```
//! use fieldscape_core::{Property, Signal};
//!
//! struct Tracker {
//!     theme: Property<String>,
//!     theme_changed: Signal<String>,
//! }
//!
//! impl Tracker {
//!     fn set_theme(&self, name: String) {
//!         if self.theme.set(name.clone()) {
//!             self.theme_changed.emit(name);
//!         }
//!     }
//! }
//! ```

use parking_lot::RwLock;

/// A value cell with change detection.
///
/// Uses interior mutability (`RwLock`), so holders can expose setters
/// through `&self` the same way models do.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()`
    /// instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection or notification.
    ///
    /// Useful during initialization or for derived updates that must not
    /// trigger the owner's changed-signal.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// When the new value equals the current one nothing is written and
    /// `false` is returned. The caller should emit its associated
    /// notification signal only when this returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            let old = std::mem::replace(&mut *current, value);
            Some(old)
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}

static_assertions::assert_impl_all!(Property<String>: Send, Sync);
