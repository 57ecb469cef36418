//! Signal/slot system for Fieldscape.
//!
//! This module provides a type-safe signal/slot mechanism for change
//! notification between models and the views observing them. Signals are
//! emitted by objects when their state changes, and connected slots
//! (callbacks) are invoked in response.
//!
//! # Delivery contract
//!
//! Delivery is synchronous and non-deferred: every connected slot runs on
//! the emitting call stack, in connection order, before [`Signal::emit`]
//! returns. There is no queuing and no event loop involved, so a caller can
//! assert on a slot's side effects immediately after the mutation that
//! triggered the emission.
//!
//! # Example
//!
//! ```
//! use fieldscape_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let theme_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = theme_changed.connect(|name| {
//!     println!("Theme changed to: {}", name);
//! });
//!
//! // Emit the signal
//! theme_changed.emit("Autumn".to_string());
//!
//! // Disconnect when done
//! theme_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke (Arc-wrapped so emission can run outside
    /// the connection-list lock).
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// Signals are the core of the observer pattern in Fieldscape. When a
/// signal is emitted, all connected slots are invoked with the provided
/// arguments before `emit` returns.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(String, bool)` for
///   multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`; the connection list lives behind a
/// mutex. The intended use is still a single UI-bound thread of control;
/// emission never crosses threads.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot
    /// later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
        })
    }

    /// Connect a slot and return a guard that disconnects it when dropped.
    ///
    /// Useful for scoped observers: the connection lives exactly as long as
    /// the guard.
    pub fn connect_guarded<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            signal: self,
            id: Some(self.connect(slot)),
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false`
    /// otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. This is useful during
    /// batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Otherwise every
    /// connected slot is called on the current stack, in connection order.
    ///
    /// The connection list is snapshotted before invocation, so a slot may
    /// connect or disconnect slots on the same signal without deadlocking;
    /// such changes take effect from the next emission.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "fieldscape_core::signal", "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> = self
            .connections
            .lock()
            .iter()
            .map(|(_, conn)| conn.slot.clone())
            .collect();

        tracing::trace!(
            target: "fieldscape_core::signal",
            connection_count = slots.len(),
            "emitting signal"
        );

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args: 'static> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

/// RAII guard for a signal connection.
///
/// Disconnects the slot when dropped. Obtained via
/// [`Signal::connect_guarded`].
pub struct ConnectionGuard<'a, Args: 'static> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<Args: 'static> ConnectionGuard<'_, Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Release the guard without disconnecting, returning the connection ID.
    pub fn release(mut self) -> Option<ConnectionId> {
        self.id.take()
    }
}

impl<Args: 'static> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);
static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
