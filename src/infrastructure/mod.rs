//! Infrastructure layer: in-memory adapters and the sweep timer.

pub mod persistence;
pub mod scheduler;
