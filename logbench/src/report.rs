//! Human readable rendering of a finished run.
use logbench_core::RunStatistics;
use std::fmt;
use std::time::Duration;

/// Text block summarizing one endpoint run.
///
/// Latency and throughput lines are left out when no request succeeded.
pub struct Report<'a>(pub &'a RunStatistics);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "URL: {}", stats.target)?;
        writeln!(f, "Total Requests: {}", stats.total)?;
        writeln!(f, "Successful: {}", stats.success)?;
        writeln!(f, "Failed: {}", stats.failure)?;

        if stats.failure > 0 {
            let failures = &stats.failures;
            writeln!(
                f,
                "  status mismatch: {}, timeout: {}, connection: {}, transport: {}",
                failures.status_mismatch, failures.timeout, failures.connection, failures.transport
            )?;
        }

        if let (Some(mean), Some(max)) = (stats.mean_latency, stats.max_latency) {
            writeln!(f, "Avg Latency: {:.4}s", mean.as_secs_f64())?;
            writeln!(f, "Max Latency: {:.4}s", max.as_secs_f64())?;
        }

        if let (Some(p50), Some(p90), Some(p99)) =
            (stats.latency_p50, stats.latency_p90, stats.latency_p99)
        {
            writeln!(
                f,
                "Latency p50/p90/p99: {:.4}s / {:.4}s / {:.4}s",
                p50.as_secs_f64(),
                p90.as_secs_f64(),
                p99.as_secs_f64()
            )?;
        }

        if let Some(throughput) = stats.throughput {
            writeln!(f, "Response Rate: {throughput:.2} req/sec")?;
        }

        write!(
            f,
            "Elapsed: {}",
            humantime::format_duration(Duration::from_millis(stats.elapsed.as_millis() as u64))
        )
    }
}

/// Print the report for one endpoint to stdout.
pub fn emit(stats: &RunStatistics) {
    println!("\n{}", Report(stats));
}
