//! Child lifecycle decisions driven by watched-node data.

use std::time::Duration;

use tokio_util::task::TaskTracker;

use crate::display;
use crate::process::{relay, ManagedChild};

/// Reacts to data-presence transitions on the watched node.
///
/// Owns the at-most-one-child invariant: any existing child is terminated
/// and reaped before the handle is cleared or a replacement is launched.
/// All calls are made from the single event-routing task, so the
/// stop-then-start sequence is atomic by construction.
pub struct ProcessController {
    command: Vec<String>,
    grace: Duration,
    relays: TaskTracker,
    child: Option<ManagedChild>,
}

impl ProcessController {
    /// Create a controller for the fixed `command` vector.
    ///
    /// Relay tasks for child output are spawned through `relays` so the
    /// hosting process can wait for them to drain at shutdown; the
    /// controller itself never joins them.
    #[must_use]
    pub fn new(command: Vec<String>, grace: Duration, relays: TaskTracker) -> Self {
        Self {
            command,
            grace,
            relays,
            child: None,
        }
    }

    /// Apply one observation of the watched node.
    ///
    /// `None` means the node is absent: any running child is terminated and
    /// reaped. `Some(data)` means the node has data: the previous child (if
    /// any) is terminated and reaped first, then a fresh child is launched
    /// with its output wired to the supervisor's stdout/stderr. The payload
    /// itself is shown but never parameterizes the command.
    pub async fn apply(&mut self, payload: Option<&[u8]>) {
        match payload {
            None => self.stop("killing process").await,
            Some(data) => {
                self.stop("stopping child").await;
                display::print_node_data(data);
                self.start().await;
            }
        }
    }

    /// Terminate and reap the current child, if any.
    async fn stop(&mut self, action: &str) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        let pid = child.id();
        display::print_child_stopping(pid, action);
        tracing::info!(pid, action, "Terminating child");

        if let Err(e) = child.terminate(self.grace).await {
            // Best effort: the handle is already cleared, a replacement
            // launch re-validates process existence.
            tracing::warn!(pid, error = %e, "Failed to reap child, dropping handle");
        }
    }

    /// Launch a new child and wire its output relays.
    async fn start(&mut self) {
        match ManagedChild::spawn(&self.command) {
            Ok(mut child) => {
                if let Some(stdout) = child.take_stdout() {
                    self.relays.spawn(relay(stdout, tokio::io::stdout()));
                }
                if let Some(stderr) = child.take_stderr() {
                    self.relays.spawn(relay(stderr, tokio::io::stderr()));
                }
                display::print_child_started(child.id(), &self.command);
                tracing::info!(
                    pid = child.id(),
                    command = %display::render_command(&self.command),
                    "Child started"
                );
                self.child = Some(child);
            }
            Err(e) => {
                // Not retried; the controller waits for the next data event.
                display::print_error(&format!("Failed to start child: {e}"));
                tracing::error!(
                    command = %display::render_command(&self.command),
                    error = %e,
                    "Failed to start child"
                );
            }
        }
    }

    /// Whether a child is currently held.
    #[must_use]
    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// Pid of the current child, if one is running.
    #[must_use]
    pub fn child_id(&self) -> Option<u32> {
        self.child.as_ref().and_then(ManagedChild::id)
    }
}
