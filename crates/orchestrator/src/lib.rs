//! Orchestrator - bounded-parallel subnet sweeps

mod coordinator;
mod progress;

pub use coordinator::ScanCoordinator;
pub use progress::{format_duration, ProgressSnapshot, ProgressTracker};
