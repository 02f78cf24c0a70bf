//! Progress tracking

use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Per-scan verdict counters. Created for one scan and dropped with it.
pub struct ProgressTracker {
    total: Mutex<usize>,
    alive: Mutex<usize>,
    unreachable: Mutex<usize>,
    failed: Mutex<usize>,
}

/// Snapshot of a tracker's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub alive: usize,
    pub unreachable: usize,
    pub failed: usize,
}

impl ProgressSnapshot {
    pub fn completed(&self) -> usize {
        self.alive + self.unreachable + self.failed
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            total: Mutex::new(0),
            alive: Mutex::new(0),
            unreachable: Mutex::new(0),
            failed: Mutex::new(0),
        }
    }

    pub async fn set_total(&self, total: usize) {
        *self.total.lock().await = total;
    }

    pub async fn record(&self, alive: bool) {
        if alive {
            *self.alive.lock().await += 1;
        } else {
            *self.unreachable.lock().await += 1;
        }
    }

    /// A probe task that died without producing a verdict.
    pub async fn increment_failed(&self) {
        *self.failed.lock().await += 1;
    }

    pub async fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total: *self.total.lock().await,
            alive: *self.alive.lock().await,
            unreachable: *self.unreachable.lock().await,
            failed: *self.failed.lock().await,
        }
    }

    pub async fn log_summary(&self, elapsed: Duration) {
        let s = self.snapshot().await;

        info!(
            "Scan finished in {}: {} total, {} alive, {} unreachable, {} failed",
            format_duration(elapsed),
            s.total,
            s.alive,
            s.unreachable,
            s.failed
        );
        if s.total > 0 {
            info!("  Alive rate: {:.1}%", (s.alive as f64 / s.total as f64) * 100.0);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs == 0 {
        format!("{}ms", millis)
    } else if total_secs < 60 {
        if millis > 0 {
            format!("{}.{:03}s", total_secs, millis)
        } else {
            format!("{}s", total_secs)
        }
    } else {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    }
}
