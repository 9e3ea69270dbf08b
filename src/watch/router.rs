//! Single ingress point for watcher notifications.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::display;
use crate::process::ProcessController;
use crate::session::SessionGate;
use crate::watch::{RawEvent, WatcherNotification};

/// The watcher collaborator's own raw-event processing logic.
///
/// Raw events are forwarded here verbatim; reconstructing semantic
/// callbacks from them (and re-arming one-shot watches) is the
/// collaborator's job, not the supervisor's.
pub trait RawEventSink: Send + Sync {
    fn process_raw_event(&self, event: RawEvent);
}

/// Classifies queued watcher notifications and dispatches them.
///
/// Runs as a single consumer task, so controller invocations are
/// serialized: a terminate-reap-launch sequence for one data event always
/// completes before the next event is looked at.
pub struct EventRouter {
    controller: ProcessController,
    gate: SessionGate,
    raw_sink: Option<Arc<dyn RawEventSink>>,
}

impl EventRouter {
    #[must_use]
    pub fn new(
        controller: ProcessController,
        gate: SessionGate,
        raw_sink: Option<Arc<dyn RawEventSink>>,
    ) -> Self {
        Self {
            controller,
            gate,
            raw_sink,
        }
    }

    /// Consume notifications until the session closes or every handle is gone.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<WatcherNotification>) {
        while let Some(notification) = rx.recv().await {
            match notification {
                WatcherNotification::Raw(event) => self.forward_raw(event),
                WatcherNotification::Data(payload) => {
                    self.controller.apply(payload.as_deref()).await;
                }
                WatcherNotification::SessionClosed(reason) => {
                    display::print_session_closed(&reason.to_string());
                    tracing::warn!(code = reason.code(), "Session permanently lost");
                    self.gate.declare_closed(reason);
                    // Terminal: no further callbacks are honored. The child,
                    // if any, is deliberately left running.
                    break;
                }
            }
        }
    }

    fn forward_raw(&self, event: RawEvent) {
        if let Some(sink) = &self.raw_sink {
            sink.process_raw_event(event);
        } else {
            tracing::trace!(?event, "No raw-event sink, dropping event");
        }
    }
}
