//! Core data types for the pingsweep scanner
//!
//! Everything here is request-scoped: a scan creates its job and results,
//! and they are dropped once the response has been serialised.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use uuid::Uuid;

/// Default bound on simultaneously running probes.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Body of a `POST /scan` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// CIDR block to sweep. A missing field decodes as empty and fails validation later.
    #[serde(default)]
    pub subnet: String,
}

/// Liveness verdict for a single address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ip: String,
    pub alive: bool,
}

impl ScanResult {
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(ip: S, alive: bool) -> Self {
        Self {
            ip: ip.into(),
            alive,
        }
    }

    #[inline]
    #[must_use]
    pub fn alive<S: Into<String>>(ip: S) -> Self {
        Self::new(ip, true)
    }

    #[inline]
    #[must_use]
    pub fn unreachable<S: Into<String>>(ip: S) -> Self {
        Self::new(ip, false)
    }

    /// Numeric sort key of `ip`; see [`ip_to_u32`].
    #[inline]
    #[must_use]
    pub fn sort_key(&self) -> u32 {
        ip_to_u32(&self.ip)
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.alive { "alive" } else { "unreachable" };
        write!(f, "{} {}", self.ip, state)
    }
}

/// One sweep: a list of dotted-quad hosts tagged with an id for log correlation.
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub id: Uuid,
    pub hosts: Vec<String>,
}

impl ScanJob {
    #[inline]
    #[must_use]
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            hosts,
        }
    }

    #[inline]
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}

/// Pack a dotted-quad into a u32, first octet in the high byte.
///
/// Anything that is not exactly four dot-separated octets in `0..=255`
/// maps to 0, so malformed addresses sort first.
#[must_use]
pub fn ip_to_u32(ip: &str) -> u32 {
    let mut octets = [0u8; 4];
    let mut parts = ip.split('.');
    for slot in octets.iter_mut() {
        match parts.next().and_then(|p| p.parse::<u8>().ok()) {
            Some(v) => *slot = v,
            None => return 0,
        }
    }
    if parts.next().is_some() {
        return 0;
    }
    u32::from_be_bytes(octets)
}

/// Render a packed address back to dotted-quad.
#[inline]
#[must_use]
pub fn u32_to_ip(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}
