//! Core systems for Fieldscape.
//!
//! This crate provides the foundational reactive primitives of the
//! Fieldscape presentation-model library:
//!
//! - **Signal/Slot System**: Type-safe observer lists with synchronous,
//!   same-call-stack delivery
//! - **Property System**: Value cells with change detection
//!
//! Everything here is deliberately synchronous: slots run before `emit`
//! returns and properties never defer notification, so a caller can observe
//! the full effect of a mutation immediately. This matches the intended
//! deployment: a single UI-bound thread of control.
//!
//! # Signal/Slot Example
//!
//! ```
//! use fieldscape_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use fieldscape_core::{Property, Signal};
//!
//! // A reactive counter with change notification
//! struct Counter {
//!     value: Property<i32>,
//!     value_changed: Signal<i32>,
//! }
//!
//! impl Counter {
//!     fn new() -> Self {
//!         Self {
//!             value: Property::new(0),
//!             value_changed: Signal::new(),
//!         }
//!     }
//!
//!     fn increment(&self) {
//!         let new_value = self.value.get() + 1;
//!         if self.value.set(new_value) {
//!             self.value_changed.emit(new_value);
//!         }
//!     }
//! }
//! ```

pub mod property;
pub mod signal;

pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
