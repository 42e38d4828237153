use logbench_core::{Attempt, RunStats};
use std::sync::{Mutex, PoisonError};

/// Collects attempts from every worker of a run through a single locked entry point.
pub(crate) struct Aggregator {
    #[cfg_attr(not(feature = "metrics"), allow(unused))]
    target: String,
    stats: Mutex<RunStats>,
}

impl Aggregator {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            stats: Mutex::new(RunStats::new()),
        }
    }

    pub fn record(&self, attempt: &Attempt) {
        // RunStats::record never panics halfway, a poisoned lock still holds valid counts.
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(attempt);

        #[cfg(feature = "metrics")]
        self.publish(attempt);
    }

    /// Take the accumulated stats. Called once every worker has joined.
    pub fn finish(&self) -> RunStats {
        std::mem::take(&mut *self.stats.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[cfg(feature = "metrics")]
    fn publish(&self, attempt: &Attempt) {
        metrics::counter!(
            crate::REQUESTS_METRIC,
            "target" => self.target.clone(),
            "outcome" => attempt.kind()
        )
        .increment(1);

        if let Some(latency) = attempt.latency() {
            metrics::histogram!(crate::LATENCY_METRIC, "target" => self.target.clone())
                .record(latency.as_secs_f64());
        }
    }
}
