// crates/orchestrator/src/coordinator.rs
//! Scan coordinator - bounded fan-out of probes and result ordering

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::progress::ProgressTracker;
use pingsweep_common::{Prober, ScanJob, ScanResult, DEFAULT_CONCURRENCY};

/// Runs one probe per host with at most `concurrency` probes in flight and
/// returns the verdicts sorted by numeric address.
pub struct ScanCoordinator {
    prober: Arc<dyn Prober>,
    concurrency: usize,
}

impl ScanCoordinator {
    /// Create a coordinator with the default bound of 50 in-flight probes.
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Change the in-flight bound. Clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn prober_name(&self) -> &str {
        self.prober.name()
    }

    /// Probe every host in `hosts`.
    pub async fn scan(&self, hosts: Vec<String>) -> Vec<ScanResult> {
        self.run(ScanJob::new(hosts)).await
    }

    /// Probe every host in the job and wait for all verdicts.
    ///
    /// Output has one entry per input host, ascending by numeric address
    /// regardless of input order or completion order. A probe task that
    /// panics leaves its host marked unreachable. Dropping the returned
    /// future aborts all outstanding probes.
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn run(&self, job: ScanJob) -> Vec<ScanResult> {
        let started = Instant::now();
        let progress = Arc::new(ProgressTracker::new());
        progress.set_total(job.host_count()).await;

        info!(
            "Starting scan of {} host(s) with {} (concurrency={})",
            job.host_count(),
            self.prober.name(),
            self.concurrency
        );

        // One slot per input position; each task only reports its own index.
        let mut slots: Vec<ScanResult> = job
            .hosts
            .iter()
            .map(|ip| ScanResult::unreachable(ip.as_str()))
            .collect();

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (idx, ip) in job.hosts.into_iter().enumerate() {
            let permits = permits.clone();
            let prober = self.prober.clone();
            let progress = progress.clone();

            tasks.spawn(async move {
                // Held until the task ends, including on panic or abort.
                let _permit = match permits.acquire_owned().await {
                    Ok(p) => p,
                    Err(_) => return (idx, false),
                };
                let alive = prober.probe(&ip).await;
                progress.record(alive).await;
                (idx, alive)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, alive)) => slots[idx].alive = alive,
                Err(e) => {
                    warn!("Probe task failed: {}", e);
                    progress.increment_failed().await;
                }
            }
        }

        slots.sort_by_key(ScanResult::sort_key);
        progress.log_summary(started.elapsed()).await;
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Alive only for the listed addresses.
    struct StubProber {
        alive: HashSet<String>,
    }

    impl StubProber {
        fn new(alive: &[&str]) -> Self {
            Self {
                alive: alive.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl Prober for StubProber {
        async fn probe(&self, ip: &str) -> bool {
            self.alive.contains(ip)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Tracks how many probes run at once.
    #[derive(Default)]
    struct CountingProber {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Prober for CountingProber {
        async fn probe(&self, _ip: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            false
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    /// Panics on one address.
    struct PanickingProber;

    #[async_trait]
    impl Prober for PanickingProber {
        async fn probe(&self, ip: &str) -> bool {
            if ip == "10.0.0.2" {
                panic!("probe exploded");
            }
            true
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn subnet_24() -> Vec<String> {
        (1..=254).map(|i| format!("192.168.1.{}", i)).collect()
    }

    #[tokio::test]
    async fn stub_scan_reports_alive_hosts_in_order() {
        let coordinator =
            ScanCoordinator::new(Arc::new(StubProber::new(&["192.168.1.1", "192.168.1.3"])));

        let results = coordinator.scan(subnet_24()).await;

        assert_eq!(results.len(), 254);
        for (i, r) in results.iter().enumerate() {
            let host = i + 1;
            assert_eq!(r.ip, format!("192.168.1.{}", host));
            assert_eq!(r.alive, host == 1 || host == 3, "{}", r.ip);
        }
    }

    #[tokio::test]
    async fn output_is_sorted_and_complete() {
        let hosts: Vec<String> = ["10.0.1.0", "10.0.0.255", "9.255.255.255", "10.0.0.10", "10.0.0.9"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let coordinator = ScanCoordinator::new(Arc::new(StubProber::new(&["10.0.0.9"])));

        let results = coordinator.scan(hosts.clone()).await;

        let ips: Vec<&str> = results.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, ["9.255.255.255", "10.0.0.9", "10.0.0.10", "10.0.0.255", "10.0.1.0"]);
        let mut expected = hosts.clone();
        expected.sort();
        let mut got: Vec<String> = results.iter().map(|r| r.ip.clone()).collect();
        got.sort();
        assert_eq!(got, expected);
        assert!(results.iter().filter(|r| r.alive).all(|r| r.ip == "10.0.0.9"));
    }

    #[tokio::test]
    async fn input_order_does_not_matter() {
        let coordinator = ScanCoordinator::new(Arc::new(StubProber::new(&[
            "192.168.1.7",
            "192.168.1.200",
        ])));
        let baseline = coordinator.scan(subnet_24()).await;

        let mut reversed = subnet_24();
        reversed.reverse();
        assert_eq!(coordinator.scan(reversed).await, baseline);

        let mut rotated = subnet_24();
        rotated.rotate_left(97);
        assert_eq!(coordinator.scan(rotated).await, baseline);

        let mut interleaved: Vec<String> = subnet_24().into_iter().step_by(2).collect();
        interleaved.extend(subnet_24().into_iter().skip(1).step_by(2));
        assert_eq!(coordinator.scan(interleaved).await, baseline);
    }

    #[tokio::test]
    async fn never_exceeds_fifty_in_flight() {
        let prober = Arc::new(CountingProber::default());
        let coordinator = ScanCoordinator::new(prober.clone());
        assert_eq!(coordinator.concurrency(), 50);

        let results = coordinator.scan(subnet_24()).await;

        assert_eq!(results.len(), 254);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 254);
        let max = prober.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 50, "saw {} probes in flight", max);
        assert!(max > 1, "probes never overlapped");
    }

    #[tokio::test]
    async fn custom_concurrency_is_respected() {
        let prober = Arc::new(CountingProber::default());
        let coordinator = ScanCoordinator::new(prober.clone()).with_concurrency(4);

        coordinator.scan(subnet_24()[..40].to_vec()).await;

        assert!(prober.max_in_flight.load(Ordering::SeqCst) <= 4);
        assert_eq!(ScanCoordinator::new(prober).with_concurrency(0).concurrency(), 1);
    }

    #[tokio::test]
    async fn oversized_concurrency_is_clamped() {
        let coordinator =
            ScanCoordinator::new(Arc::new(StubProber::new(&["10.0.0.1"]))).with_concurrency(usize::MAX);
        assert_eq!(coordinator.concurrency(), Semaphore::MAX_PERMITS);

        let results = coordinator
            .scan(vec!["10.0.0.2".to_string(), "10.0.0.1".to_string()])
            .await;
        assert_eq!(
            results,
            vec![ScanResult::alive("10.0.0.1"), ScanResult::unreachable("10.0.0.2")]
        );
    }

    #[tokio::test]
    async fn panicking_task_is_reported_unreachable() {
        let coordinator = ScanCoordinator::new(Arc::new(PanickingProber));
        let hosts = vec!["10.0.0.3".to_string(), "10.0.0.2".to_string(), "10.0.0.1".to_string()];

        let results = coordinator.scan(hosts).await;

        assert_eq!(
            results,
            vec![
                ScanResult::alive("10.0.0.1"),
                ScanResult::unreachable("10.0.0.2"),
                ScanResult::alive("10.0.0.3"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let coordinator = ScanCoordinator::new(Arc::new(StubProber::new(&[])));
        assert!(coordinator.scan(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_addresses_sort_first() {
        let coordinator = ScanCoordinator::new(Arc::new(StubProber::new(&[])));
        let results = coordinator
            .scan(vec!["10.0.0.1".to_string(), "bogus".to_string()])
            .await;
        assert_eq!(results[0].ip, "bogus");
        assert_eq!(results[1].ip, "10.0.0.1");
    }

    /// Sleeps for a long time, counting starts and drops.
    #[derive(Default)]
    struct SlowProber {
        started: AtomicUsize,
        dropped: Arc<AtomicUsize>,
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Prober for SlowProber {
        async fn probe(&self, _ip: &str) -> bool {
            self.started.fetch_add(1, Ordering::SeqCst);
            let _guard = DropCounter(self.dropped.clone());
            tokio::time::sleep(Duration::from_secs(30)).await;
            true
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn dropping_the_scan_aborts_probes() {
        let prober = Arc::new(SlowProber::default());
        let coordinator = ScanCoordinator::new(prober.clone()).with_concurrency(4);

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), coordinator.scan(subnet_24())).await;
        assert!(outcome.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(prober.started.load(Ordering::SeqCst), 4);
        assert_eq!(prober.dropped.load(Ordering::SeqCst), 4);
    }
}
