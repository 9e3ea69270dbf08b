//! Notification types crossing the watcher boundary.

use std::fmt;

/// Result code for an expired coordination session.
const CODE_SESSION_EXPIRED: i32 = -112;
/// Result code for an authentication failure.
const CODE_AUTH_FAILED: i32 = -102;

/// A raw connectivity/watch event. Its semantics are opaque to the
/// supervisor core; it is forwarded verbatim to the watcher collaborator.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Event kind as reported by the coordination client.
    pub kind: String,
    /// Connection state at the time of the event.
    pub state: String,
    /// Node path the event refers to, when it refers to one.
    pub path: Option<String>,
}

/// Why the session was permanently lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The session timed out and cannot be re-established.
    Expired,
    /// The client is no longer authorized.
    AuthFailed,
    /// Any other terminal result code.
    Other(i32),
}

impl CloseReason {
    /// Map a coordination-service result code to a reason.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            CODE_SESSION_EXPIRED => Self::Expired,
            CODE_AUTH_FAILED => Self::AuthFailed,
            other => Self::Other(other),
        }
    }

    /// The underlying result code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Expired => CODE_SESSION_EXPIRED,
            Self::AuthFailed => CODE_AUTH_FAILED,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "session expired"),
            Self::AuthFailed => write!(f, "authentication failed"),
            Self::Other(code) => write!(f, "code {code}"),
        }
    }
}

/// One notification from the watcher collaborator, queued for the router.
#[derive(Debug)]
pub enum WatcherNotification {
    /// Raw event to forward back to the collaborator's processing logic.
    Raw(RawEvent),
    /// The watched node's data, or `None` when the node is absent.
    Data(Option<Vec<u8>>),
    /// The session is permanently and unrecoverably lost.
    SessionClosed(CloseReason),
}
