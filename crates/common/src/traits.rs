//! Core traits for pingsweep components

use async_trait::async_trait;

/// Liveness prober - decides whether a single host answers.
///
/// Implementations must not fail: any transport or subprocess problem is
/// reported as `false`.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one dotted-quad address.
    async fn probe(&self, ip: &str) -> bool;

    /// Prober name/identifier
    fn name(&self) -> &str;
}
