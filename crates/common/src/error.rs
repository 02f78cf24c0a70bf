//! Error types for pingsweep
//!
//! Input-validation errors are surfaced to HTTP callers; probe failures are
//! absorbed by the prober and never leave it.

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum PingsweepError {
    #[error("{0}")]
    InvalidSubnet(String),

    #[error("subnet {subnet} expands to {hosts} hosts which exceeds the allowed limit of {limit}")]
    TooManyHosts { subnet: String, hosts: u64, limit: u64 },

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Probe failed: {0}")]
    ProbeFailure(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PingsweepError {
    /// True for errors caused by caller input rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            PingsweepError::InvalidSubnet(_)
                | PingsweepError::TooManyHosts { .. }
                | PingsweepError::MalformedRequest(_)
                | PingsweepError::MethodNotAllowed
        )
    }
}

/// Result type alias for pingsweep operations
pub type PingsweepResult<T> = Result<T, PingsweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(PingsweepError::InvalidSubnet("bad".into()).is_client_error());
        assert!(PingsweepError::MethodNotAllowed.is_client_error());
        assert!(!PingsweepError::Template("boom".into()).is_client_error());
        assert!(!PingsweepError::ProbeFailure("spawn".into()).is_client_error());
    }

    #[test]
    fn too_many_hosts_message() {
        let e = PingsweepError::TooManyHosts {
            subnet: "10.0.0.0/8".into(),
            hosts: 16_777_214,
            limit: 65_536,
        };
        assert_eq!(
            e.to_string(),
            "subnet 10.0.0.0/8 expands to 16777214 hosts which exceeds the allowed limit of 65536"
        );
    }
}
