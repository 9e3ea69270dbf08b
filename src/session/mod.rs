//! Session lifecycle coordination.

mod gate;

pub use gate::*;
