//! Signal/slot system for the widget drawer.
//!
//! Signals are emitted by the drawer's state holders when their state changes,
//! and connected slots (callbacks) are invoked synchronously, in the emitting
//! thread, before `emit` returns.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Delivery
//!
//! The connection table is never locked while slots run. A slot may connect
//! or disconnect other slots (or itself) on the signal that is currently
//! emitting; such changes take effect from the next emission.
//!
//! # Example
//!
//! ```
//! use widget_drawer_core::Signal;
//!
//! let editing_changed = Signal::<bool>::new();
//!
//! let conn_id = editing_changed.connect(|editing| {
//!     println!("Editing: {}", editing);
//! });
//!
//! editing_changed.emit(true);
//! editing_changed.disconnect(conn_id);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Connection table shared between a signal and the guards it hands out.
struct Connections<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

/// Anything a [`ConnectionGuard`] can disconnect from.
trait Disconnect: Send + Sync {
    fn disconnect(&self, id: ConnectionId) -> bool;
}

impl<Args: 'static> Disconnect for Connections<Args> {
    fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with a reference
/// to the provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(usize, WidgetId)` for several.
pub struct Signal<Args> {
    connections: Arc<Connections<Args>>,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Connections {
                slots: Mutex::new(SlotMap::with_key()),
            }),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.slots.lock().insert(Arc::new(slot))
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    ///
    /// The guard only holds a weak reference to the connection table, so it
    /// may outlive the signal; dropping it afterwards is a no-op.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let connections: Arc<dyn Disconnect> = self.connections.clone();
        ConnectionGuard {
            connections: Arc::downgrade(&connections),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.disconnect(id)
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.slots.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.slots.lock().len()
    }

    /// Emit the signal, invoking all connected slots in the current thread.
    ///
    /// The set of slots is snapshotted before the first slot runs.
    #[tracing::instrument(skip_all, target = "widget_drawer_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.connections.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`]. Guards are not generic over the
/// signal's argument type, so guards for different signals can be kept
/// together in one collection.
///
/// # Example
///
/// ```
/// use widget_drawer_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
#[must_use = "dropping the guard disconnects the slot immediately"]
pub struct ConnectionGuard {
    connections: Weak<dyn Disconnect>,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Disconnect now. Returns `true` if the connection was still live.
    pub fn disconnect(self) -> bool {
        self.release()
    }

    fn release(&self) -> bool {
        match self.connections.upgrade() {
            Some(connections) => connections.disconnect(self.id),
            None => false,
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl std::fmt::Debug for ConnectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}
