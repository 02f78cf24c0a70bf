//! Pingsweep Common - Shared types and traits
//!
//! This crate provides the types, traits, and error taxonomy used across
//! the pingsweep crates:
//! - `ScanRequest` / `ScanResult` wire types
//! - the `Prober` seam between the coordinator and liveness checks
//! - numeric address ordering helpers

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PingsweepError, PingsweepResult};
pub use traits::Prober;
pub use types::{ip_to_u32, u32_to_ip, ScanJob, ScanRequest, ScanResult, DEFAULT_CONCURRENCY};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
