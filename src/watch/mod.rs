//! Watcher-collaborator boundary: event types, delivery handle, and routing.

mod events;
mod handle;
mod router;

pub use events::*;
pub use handle::*;
pub use router::*;
