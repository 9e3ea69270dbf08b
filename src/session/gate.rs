//! The rendezvous that keeps the supervisor alive until the session dies.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::watch::CloseReason;

/// Tracks whether the coordination session is still alive.
///
/// The gate starts alive and can transition to closed exactly once; the
/// transition never reverts. Waiters block in [`SessionGate::await_closed`]
/// and are all released by the first [`SessionGate::declare_closed`] call.
/// Cloning yields another handle to the same gate.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    closed: CancellationToken,
    reason: Arc<OnceLock<CloseReason>>,
}

impl SessionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition to closed and release every waiter.
    ///
    /// Idempotent: later calls change nothing, and the first reason wins.
    pub fn declare_closed(&self, reason: CloseReason) {
        if self.reason.set(reason).is_ok() {
            tracing::info!(%reason, "Session declared permanently closed");
        }
        // Reason is stored before the token fires so waiters always see it.
        self.closed.cancel();
    }

    /// Block until the session is declared closed, returning the reason.
    ///
    /// Returns immediately if the gate is already closed. Any number of
    /// concurrent waiters is fine.
    pub async fn await_closed(&self) -> CloseReason {
        self.closed.cancelled().await;
        self.reason
            .get()
            .copied()
            .unwrap_or(CloseReason::Other(0))
    }

    /// Non-blocking query of the gate state.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}
