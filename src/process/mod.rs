//! Child process spawning, termination, and output relaying.

mod child;
mod controller;
mod relay;

pub use child::*;
pub use controller::*;
pub use relay::*;
