//! Construction-time wiring of the supervisor components.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::config::SupervisorConfig;
use crate::process::ProcessController;
use crate::session::SessionGate;
use crate::watch::{CloseReason, EventRouter, RawEventSink, WatcherHandle};

/// A running supervisor: router task, session gate, and the delivery handle
/// a coordination-client integration feeds callbacks into.
pub struct Supervisor {
    gate: SessionGate,
    handle: WatcherHandle,
    relays: TaskTracker,
    #[allow(dead_code)]
    router: tokio::task::JoinHandle<()>,
}

impl Supervisor {
    /// Wire up and start a supervisor without a raw-event sink.
    #[must_use]
    pub fn spawn(config: &SupervisorConfig) -> Self {
        Self::spawn_with_raw_sink(config, None)
    }

    /// Wire up and start a supervisor, forwarding raw events to `raw_sink`.
    ///
    /// The returned value owns the router task; events flow as soon as the
    /// watcher collaborator starts delivering through [`Supervisor::handle`].
    #[must_use]
    pub fn spawn_with_raw_sink(
        config: &SupervisorConfig,
        raw_sink: Option<Arc<dyn RawEventSink>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = SessionGate::new();
        let relays = TaskTracker::new();

        let controller = ProcessController::new(
            config.command.clone(),
            config.terminate_grace(),
            relays.clone(),
        );
        let router = EventRouter::new(controller, gate.clone(), raw_sink);
        let router = tokio::spawn(router.run(rx));

        Self {
            gate,
            handle: WatcherHandle::new(tx),
            relays,
            router,
        }
    }

    /// The delivery handle for watcher callbacks. Clonable and thread-safe.
    #[must_use]
    pub fn handle(&self) -> WatcherHandle {
        self.handle.clone()
    }

    /// The session gate, for hosts that need their own waiters.
    #[must_use]
    pub fn gate(&self) -> SessionGate {
        self.gate.clone()
    }

    /// Block until the session is declared permanently closed.
    pub async fn wait_closed(&self) -> CloseReason {
        self.gate.await_closed().await
    }

    /// Block until the session closes and in-flight output relays have
    /// naturally ended, then return the close reason.
    ///
    /// This is the supervisor's whole reason to stay alive; the hosting
    /// process is expected to exit once it returns. A child left running by
    /// the terminal-session contract keeps its relays open, so hosts that
    /// must exit regardless should race this against their own shutdown
    /// signal.
    pub async fn run(self) -> CloseReason {
        let reason = self.gate.await_closed().await;

        // No new children start after the gate closes, so the tracker can
        // be closed before draining.
        self.relays.close();
        self.relays.wait().await;

        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(command: &[&str]) -> SupervisorConfig {
        SupervisorConfig {
            node_path: "/app/config".to_string(),
            command: command.iter().map(|w| (*w).to_string()).collect(),
            terminate_grace_ms: 500,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_unblocks_on_session_close() {
        let supervisor = Supervisor::spawn(&test_config(&["echo", "hi"]));
        let handle = supervisor.handle();

        handle.session_closed(CloseReason::Expired);

        let reason = tokio::time::timeout(Duration::from_secs(2), supervisor.run())
            .await
            .expect("run should unblock once the session closes");
        assert_eq!(reason, CloseReason::Expired);
    }

    #[tokio::test]
    async fn test_wait_closed_after_close_is_immediate() {
        let supervisor = Supervisor::spawn(&test_config(&["echo", "hi"]));
        supervisor.gate().declare_closed(CloseReason::Other(-4));

        let reason = tokio::time::timeout(Duration::from_millis(100), supervisor.wait_closed())
            .await
            .expect("wait_closed should return immediately");
        assert_eq!(reason, CloseReason::Other(-4));
    }
}
