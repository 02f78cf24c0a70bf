// crates/prober/src/ping.rs
//! ICMP echo prober that runs the OS `ping` binary

use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::platform::Platform;
use pingsweep_common::{PingsweepError, PingsweepResult, Prober};

/// Slack on top of `count * reply_timeout` before a child is killed.
const DEADLINE_SLACK: Duration = Duration::from_secs(2);

/// Prober that reports a host alive when `ping` exits with status 0.
#[derive(Debug, Clone)]
pub struct PingProber {
    program: String,
    count: u32,
    reply_timeout: Duration,
    platform: Platform,
}

impl PingProber {
    /// Create a new prober with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of echo requests per probe.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    /// How long `ping` waits for each reply.
    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Executable to run instead of `ping`, resolved through `PATH`.
    pub fn with_program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = program.into();
        self
    }

    /// Override the detected command-line flavour.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Upper bound on a single probe's wall-clock time.
    pub fn deadline(&self) -> Duration {
        self.reply_timeout * self.count + DEADLINE_SLACK
    }

    /// Full argument vector passed to the program for `ip`.
    pub fn args_for(&self, ip: &str) -> Vec<String> {
        self.platform.ping_args(self.count, self.reply_timeout, ip)
    }

    /// Spawn the child and wait for its exit status.
    ///
    /// The child is killed if the deadline expires or this future is dropped.
    #[instrument(level = "debug", skip(self))]
    async fn run_ping(&self, ip: &str) -> PingsweepResult<ExitStatus> {
        let mut child = Command::new(&self.program)
            .args(self.args_for(ip))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PingsweepError::ProbeFailure(format!("failed to spawn {}: {}", self.program, e)))?;

        match timeout(self.deadline(), child.wait()).await {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(e)) => Err(PingsweepError::ProbeFailure(format!("wait failed: {}", e))),
            Err(_) => Err(PingsweepError::ProbeFailure(format!(
                "no exit after {:?}",
                self.deadline()
            ))),
        }
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self {
            program: "ping".to_string(),
            count: 3,
            reply_timeout: Duration::from_millis(1000),
            platform: Platform::current(),
        }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, ip: &str) -> bool {
        match self.run_ping(ip).await {
            Ok(status) => {
                debug!("{} -> {}", ip, status);
                status.success()
            }
            Err(e) => {
                debug!("{}: {}", ip, e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "ICMP Echo (system ping)"
    }
}
