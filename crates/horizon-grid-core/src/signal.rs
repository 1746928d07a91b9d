//! Signal/slot system for Horizon Grid.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism used
//! by table views to notify subscribers about value and selection changes.
//! Signals are emitted when state changes, and every connected slot
//! (callback) is invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Delivery
//!
//! Table views run on a single UI thread, so every slot is invoked directly
//! and synchronously in the emitting thread, in connection order, before
//! [`Signal::emit`] returns. There is no coalescing: N emissions produce N
//! slot calls.
//!
//! The connection table is not locked while slots run, so a slot may connect
//! or disconnect slots (including itself) on the same signal. Changes made
//! during an emission take effect on the next one.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let row_selected = Signal::<Option<usize>>::new();
//!
//! let conn_id = row_selected.connect(|row| {
//!     println!("selected row: {row:?}");
//! });
//!
//! row_selected.emit(Some(3));
//! row_selected.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

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

/// A connected slot and its position in connection order.
struct Connection<Args> {
    sequence: u64,
    slot: Slot<Args>,
}

/// Connection table. Slotmap keys reuse freed slots, so delivery order comes
/// from `sequence`, not from iteration order.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Connection<Args>>,
    next_sequence: u64,
}

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
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
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                next_sequence: 0,
            }),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let sequence = connections.next_sequence;
        connections.next_sequence += 1;
        connections.slots.insert(Connection {
            sequence,
            slot: Arc::new(slot),
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().slots.remove(id).is_some()
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// Returns the number of slots invoked (0 when blocked).
    #[tracing::instrument(skip_all, target = "horizon_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return 0;
        }

        // Snapshot the slots so none of them runs under the connection lock.
        let mut ordered: Vec<(u64, Slot<Args>)> = self
            .connections
            .lock()
            .slots
            .values()
            .map(|c| (c.sequence, c.slot.clone()))
            .collect();
        ordered.sort_unstable_by_key(|(sequence, _)| *sequence);
        tracing::trace!(target: targets::SIGNAL, connection_count = ordered.len(), "emitting signal");

        for (_, slot) in &ordered {
            slot(&args);
        }
        ordered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Recorded<T> = Arc<Mutex<Vec<T>>>;

    fn recorder<T: Clone + Send + 'static>() -> (Recorded<T>, impl Fn(&T) + Send + Sync + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn test_every_emission_is_delivered() {
        let signal = Signal::<usize>::new();
        let (rows, slot) = recorder::<usize>();
        signal.connect(slot);

        signal.emit(4);
        signal.emit(4);
        signal.emit(0);

        assert_eq!(*rows.lock(), vec![4, 4, 0]);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let signal = Signal::<&'static str>::new();
        let (seen, slot) = recorder::<&'static str>();
        let id = signal.connect(slot);

        signal.emit("insert");
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit("delete");

        assert_eq!(*seen.lock(), vec!["insert"]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_blocked_signal_delivers_nothing() {
        let signal = Signal::<u8>::new();
        let (seen, slot) = recorder::<u8>();
        signal.connect(slot);

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        assert_eq!(signal.emit(1), 0);
        signal.set_blocked(false);
        assert_eq!(signal.emit(2), 1);

        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn test_connection_order_survives_slot_reuse() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut ids = Vec::new();
        for name in ["first", "second", "third"] {
            let order = order.clone();
            ids.push(signal.connect(move |_| order.lock().push(name)));
        }
        // Frees the first slot; the next connection reuses it.
        signal.disconnect(ids[0]);
        let late = order.clone();
        signal.connect(move |_| late.lock().push("fourth"));

        signal.emit(());
        assert_eq!(*order.lock(), vec!["second", "third", "fourth"]);
    }

    #[test]
    fn test_slot_may_connect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let inner = signal.clone();
        signal.connect(move |_| {
            inner.connect(|_| {});
        });

        // Would deadlock if slots ran under the connection lock.
        assert_eq!(signal.emit(()), 1);
        assert_eq!(signal.connection_count(), 2);
    }
}
