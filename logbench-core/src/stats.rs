use crate::data::Attempt;
use std::time::Duration;

/// Failure counts split by cause.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FailureBreakdown {
    pub status_mismatch: u64,
    pub timeout: u64,
    pub connection: u64,
    pub transport: u64,
}

impl FailureBreakdown {
    pub fn total(&self) -> u64 {
        self.status_mismatch + self.timeout + self.connection + self.transport
    }
}

/// Accumulated outcomes of one run.
///
/// Only [`RunStats::record`] mutates it, so `total == success + failure` and
/// `latencies.len() == success` hold at every point.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    success: u64,
    failures: FailureBreakdown,
    latencies: Vec<Duration>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, attempt: &Attempt) {
        match attempt {
            Attempt::Success { latency } => {
                self.success += 1;
                self.latencies.push(*latency);
            }
            Attempt::StatusMismatch { .. } => self.failures.status_mismatch += 1,
            Attempt::Timeout => self.failures.timeout += 1,
            Attempt::Connection(_) => self.failures.connection += 1,
            Attempt::Transport(_) => self.failures.transport += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.failure()
    }

    pub fn success(&self) -> u64 {
        self.success
    }

    pub fn failure(&self) -> u64 {
        self.failures.total()
    }

    pub fn failures(&self) -> FailureBreakdown {
        self.failures
    }

    /// Latencies of successful attempts, in recording order.
    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }

    /// Summarize the run. `elapsed` is the wall clock time from pool start until every worker
    /// stopped.
    pub fn summarize(&self, target: &str, elapsed: Duration) -> RunStatistics {
        let total = self.total();
        let error_rate = (total > 0).then(|| self.failure() as f64 / total as f64);

        let (mean_latency, max_latency, latency_p50, latency_p90, latency_p99) =
            if self.latencies.is_empty() {
                (None, None, None, None, None)
            } else {
                let secs: Vec<f64> = self.latencies.iter().map(Duration::as_secs_f64).collect();
                let mean = Duration::from_secs_f64(statistical::mean(&secs));

                let mut sorted = self.latencies.clone();
                sorted.sort_unstable();
                (
                    Some(mean),
                    sorted.last().copied(),
                    Some(quantile(&sorted, 0.5)),
                    Some(quantile(&sorted, 0.9)),
                    Some(quantile(&sorted, 0.99)),
                )
            };

        let throughput = if self.success > 0 && !elapsed.is_zero() {
            Some(self.success as f64 / elapsed.as_secs_f64())
        } else {
            None
        };

        RunStatistics {
            target: target.to_string(),
            total,
            success: self.success,
            failure: self.failure(),
            failures: self.failures,
            error_rate,
            mean_latency,
            max_latency,
            latency_p50,
            latency_p90,
            latency_p99,
            throughput,
            elapsed,
        }
    }
}

/// Nearest-rank quantile over an already sorted, non-empty slice.
fn quantile(sorted: &[Duration], q: f64) -> Duration {
    let rank = (q * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Summary of one endpoint run.
///
/// Latency fields and throughput are `None` when no attempt succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    pub target: String,
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub failures: FailureBreakdown,
    pub error_rate: Option<f64>,
    pub mean_latency: Option<Duration>,
    pub max_latency: Option<Duration>,
    pub latency_p50: Option<Duration>,
    pub latency_p90: Option<Duration>,
    pub latency_p99: Option<Duration>,
    /// Successful requests per second of wall clock time.
    pub throughput: Option<f64>,
    pub elapsed: Duration,
}
