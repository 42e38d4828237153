use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use logbench_core::RunConfig;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Global issuance control shared by every worker of a run.
///
/// Two gates apply before a request goes out: a token bucket at `tps` per second (burst 1) and
/// a pool of `tps` in-flight permits. Workers additionally sleep for the pacing interval after
/// each attempt.
pub(crate) struct RequestLimiter {
    bucket: DefaultDirectRateLimiter,
    permits: Semaphore,
    pacing: Duration,
}

impl RequestLimiter {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            bucket: RateLimiter::direct(
                Quota::per_second(config.tps).allow_burst(NonZeroU32::MIN),
            ),
            permits: Semaphore::new(config.tps.get() as usize),
            pacing: config.pacing_interval(),
        }
    }

    /// Wait for a token and an in-flight permit. The permit is released on drop.
    ///
    /// Only fails if the permit pool was closed, which never happens during a run.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, AcquireError> {
        self.bucket.until_ready().await;
        self.permits.acquire().await
    }

    pub fn pacing_interval(&self) -> Duration {
        self.pacing
    }

    #[cfg(test)]
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    #[cfg(test)]
    pub fn close(&self) {
        self.permits.close();
    }
}
