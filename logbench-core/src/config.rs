use crate::{
    DEFAULT_DURATION, DEFAULT_READ_CONCURRENCY, DEFAULT_READ_TPS, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_WRITE_CONCURRENCY, DEFAULT_WRITE_TPS, READ_EXPECTED_STATUS, WRITE_EXPECTED_STATUS,
};
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

/// Parameters of one endpoint run. Fixed once the run starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Endpoint identifier, used in logs and the report.
    pub target: String,
    pub duration: Duration,
    pub concurrency: NonZeroUsize,
    /// Target requests per second shared by all workers.
    pub tps: NonZeroU32,
    pub timeout: Duration,
    pub expected_status: u16,
}

impl RunConfig {
    /// Defaults of the read (query) workload.
    pub fn read(target: &str) -> Self {
        Self {
            target: target.to_string(),
            duration: DEFAULT_DURATION,
            concurrency: DEFAULT_READ_CONCURRENCY,
            tps: DEFAULT_READ_TPS,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            expected_status: READ_EXPECTED_STATUS,
        }
    }

    /// Defaults of the write (ingestion) workload.
    pub fn write(target: &str) -> Self {
        Self {
            target: target.to_string(),
            duration: DEFAULT_DURATION,
            concurrency: DEFAULT_WRITE_CONCURRENCY,
            tps: DEFAULT_WRITE_TPS,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            expected_status: WRITE_EXPECTED_STATUS,
        }
    }

    /// Same parameters pointed at another endpoint.
    pub fn with_target(&self, target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..self.clone()
        }
    }

    /// Sleep each worker observes between attempts: `concurrency / tps` seconds.
    ///
    /// This does not account for workers that already stopped near the end of a run.
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_secs_f64(self.concurrency.get() as f64 / self.tps.get() as f64)
    }
}
