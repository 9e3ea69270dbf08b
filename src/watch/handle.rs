//! Delivery handle the watcher collaborator uses to reach the supervisor.

use tokio::sync::mpsc;

use crate::watch::{CloseReason, RawEvent, WatcherNotification};

/// Sink for node data observations.
pub trait DataEventSink: Send + Sync {
    /// Deliver the watched node's data, or `None` when the node is absent.
    fn on_data_event(&self, payload: Option<Vec<u8>>);
}

/// Sink for the terminal session-loss notification.
pub trait SessionEventSink: Send + Sync {
    /// Deliver the permanent session loss. Fired at most once.
    fn on_session_closed(&self, reason: CloseReason);
}

/// Clonable handle that enqueues watcher callbacks for the router task.
///
/// Sends never block, so the collaborator's delivery thread is never held
/// up by child shutdown happening on the router side. Notifications are
/// dispatched strictly in enqueue order. Callable from sync or async
/// contexts alike.
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    tx: mpsc::UnboundedSender<WatcherNotification>,
}

impl WatcherHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<WatcherNotification>) -> Self {
        Self { tx }
    }

    /// Deliver a raw connectivity/watch event for forwarding.
    pub fn raw_event(&self, event: RawEvent) {
        self.send(WatcherNotification::Raw(event));
    }

    /// Deliver the watched node's data, or `None` when the node is absent.
    pub fn node_data(&self, payload: Option<Vec<u8>>) {
        self.send(WatcherNotification::Data(payload));
    }

    /// Deliver the permanent session loss.
    pub fn session_closed(&self, reason: CloseReason) {
        self.send(WatcherNotification::SessionClosed(reason));
    }

    fn send(&self, notification: WatcherNotification) {
        // The router stops once the session closes; anything delivered
        // after that is dropped by contract.
        if self.tx.send(notification).is_err() {
            tracing::trace!("Dropping notification, router has stopped");
        }
    }
}

impl DataEventSink for WatcherHandle {
    fn on_data_event(&self, payload: Option<Vec<u8>>) {
        self.node_data(payload);
    }
}

impl SessionEventSink for WatcherHandle {
    fn on_session_closed(&self, reason: CloseReason) {
        self.session_closed(reason);
    }
}
