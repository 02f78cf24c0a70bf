//! Liveness prober backed by the system `ping` utility
//!
//! Needs no raw-socket privileges; only the child's exit status is inspected.

mod ping;
mod platform;

pub use ping::PingProber;
pub use platform::Platform;
