//! Table change notification.

use horizon_grid_core::logging::targets;
use horizon_grid_core::{ConnectionId, Signal};

/// Why the record values changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCause {
    /// A cell edit was committed.
    Edit { row: usize, field: usize },
    /// A zero-valued record was inserted at `row`.
    Insert { row: usize },
    /// The record at `row` was deleted.
    Delete { row: usize },
}

/// Events emitted by a table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableEvent {
    /// Record values changed through the table.
    ValueChanged(ChangeCause),
    /// The selected row changed. `None` when the selection was cleared.
    SelectionChanged(Option<usize>),
}

/// Multicast notifier for [`TableEvent`]s.
///
/// Subscribers run synchronously on the thread that changed the table,
/// before the changing operation returns.
#[derive(Default)]
pub struct ChangeNotifier {
    signal: Signal<TableEvent>,
}

impl ChangeNotifier {
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to every event.
    pub fn subscribe<F>(&self, f: F) -> ConnectionId
    where
        F: Fn(&TableEvent) + Send + Sync + 'static,
    {
        self.signal.connect(f)
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.signal.disconnect(id)
    }

    /// Number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.signal.connection_count()
    }

    /// Suppresses delivery while `blocked` is set.
    pub fn set_blocked(&self, blocked: bool) {
        self.signal.set_blocked(blocked);
    }

    /// The underlying signal.
    pub fn signal(&self) -> &Signal<TableEvent> {
        &self.signal
    }

    pub(crate) fn notify(&self, event: TableEvent) {
        tracing::trace!(target: targets::TABLE, ?event, "table event");
        self.signal.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_notify_reaches_subscribers() {
        let notifier = ChangeNotifier::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let id = notifier.subscribe(move |event| events_clone.lock().push(*event));

        notifier.notify(TableEvent::SelectionChanged(Some(2)));
        notifier.notify(TableEvent::ValueChanged(ChangeCause::Insert { row: 0 }));
        assert!(notifier.unsubscribe(id));
        notifier.notify(TableEvent::SelectionChanged(None));

        assert_eq!(
            *events.lock(),
            vec![
                TableEvent::SelectionChanged(Some(2)),
                TableEvent::ValueChanged(ChangeCause::Insert { row: 0 }),
            ]
        );
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
