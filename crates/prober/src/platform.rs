//! Platform-specific `ping` flags

use std::fmt;
use std::time::Duration;

/// Flavour of `ping` command line to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `ping -n <count> -w <millis>`
    Windows,
    /// `ping -c <count> -W <seconds>`
    Unix,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Self {
        if os.eq_ignore_ascii_case("windows") {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Arguments for `count` echo requests to `ip`, waiting `reply_timeout` for each reply.
    pub fn ping_args(&self, count: u32, reply_timeout: Duration, ip: &str) -> Vec<String> {
        match self {
            Platform::Windows => vec![
                "-n".to_string(),
                count.to_string(),
                "-w".to_string(),
                reply_timeout.as_millis().max(1).to_string(),
                ip.to_string(),
            ],
            Platform::Unix => {
                // -W takes whole seconds; round up so sub-second timeouts still wait.
                let secs = (reply_timeout.as_millis() + 999) / 1000;
                vec![
                    "-c".to_string(),
                    count.to_string(),
                    "-W".to_string(),
                    secs.max(1).to_string(),
                    ip.to_string(),
                ]
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::Unix => f.write_str("unix"),
        }
    }
}
