use crate::aggregator::Aggregator;
use crate::limiter::RequestLimiter;
use crate::workload::Workload;
use logbench_core::{Attempt, RunConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerState {
    Running,
    Paced,
    Stopped,
}

impl WorkerState {
    /// State to enter once the current one has finished its work.
    ///
    /// The run duration is only checked here, so an in-flight request always completes.
    fn next(self, elapsed: Duration, duration: Duration) -> Self {
        match self {
            WorkerState::Running => WorkerState::Paced,
            WorkerState::Paced if elapsed < duration => WorkerState::Running,
            WorkerState::Paced | WorkerState::Stopped => WorkerState::Stopped,
        }
    }

    fn initial(elapsed: Duration, duration: Duration) -> Self {
        if elapsed < duration {
            WorkerState::Running
        } else {
            WorkerState::Stopped
        }
    }
}

pub(crate) struct Worker<W> {
    pub id: usize,
    pub workload: W,
    pub config: Arc<RunConfig>,
    pub limiter: Arc<RequestLimiter>,
    pub aggregator: Arc<Aggregator>,
    pub started: Instant,
}

impl<W: Workload> Worker<W> {
    /// Loop until the run duration is exhausted. Returns the number of attempts made.
    pub async fn run(mut self) -> u64 {
        let mut attempts = 0;
        let mut state = WorkerState::initial(self.started.elapsed(), self.config.duration);
        debug!(worker = self.id, "Worker started");

        loop {
            match state {
                WorkerState::Running => {
                    if self.attempt().await {
                        attempts += 1;
                    }
                }
                WorkerState::Paced => {
                    tokio::time::sleep(self.limiter.pacing_interval()).await;
                }
                WorkerState::Stopped => break,
            }
            state = state.next(self.started.elapsed(), self.config.duration);
        }

        debug!(worker = self.id, attempts, "Worker stopped");
        attempts
    }

    /// Issue and record one request. Returns `false` if nothing was sent.
    async fn attempt(&mut self) -> bool {
        let request = self.workload.prepare();

        let permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(err) => {
                error!("Permit pool closed during run: {err}");
                return false;
            }
        };

        let start = Instant::now();
        let attempt = match tokio::time::timeout(self.config.timeout, self.workload.send(request))
            .await
        {
            Ok(Ok(status)) => {
                Attempt::classify(status, self.config.expected_status, start.elapsed())
            }
            Ok(Err(err)) => err.into(),
            Err(_) => Attempt::Timeout,
        };
        trace!(worker = self.id, kind = attempt.kind(), "{attempt:?}");

        self.aggregator.record(&attempt);
        drop(permit);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallError;
    use std::future::Future;
    use std::num::{NonZeroU32, NonZeroUsize};

    const DURATION: Duration = Duration::from_secs(1);

    #[test]
    fn test_transitions() {
        use WorkerState::*;
        let early = Duration::from_millis(10);

        assert_eq!(WorkerState::initial(early, DURATION), Running);
        assert_eq!(WorkerState::initial(DURATION, DURATION), Stopped);

        assert_eq!(Running.next(early, DURATION), Paced);
        // Reaching the deadline mid-request still goes through pacing first.
        assert_eq!(Running.next(DURATION * 2, DURATION), Paced);

        assert_eq!(Paced.next(early, DURATION), Running);
        assert_eq!(Paced.next(DURATION, DURATION), Stopped);
        assert_eq!(Stopped.next(early, DURATION), Stopped);
    }

    #[derive(Clone)]
    struct Accepting;

    impl Workload for Accepting {
        type Request = ();

        fn fork(&mut self) -> Self {
            self.clone()
        }

        fn prepare(&mut self) {}

        fn send(&self, _: ()) -> impl Future<Output = Result<u16, CallError>> + Send {
            async { Ok(200) }
        }
    }

    fn config() -> RunConfig {
        let mut config = RunConfig::read("worker");
        config.duration = Duration::from_millis(100);
        config.concurrency = NonZeroUsize::new(1).unwrap();
        config.tps = NonZeroU32::new(100).unwrap();
        config
    }

    fn worker(limiter: Arc<RequestLimiter>, aggregator: Arc<Aggregator>) -> Worker<Accepting> {
        Worker {
            id: 0,
            workload: Accepting,
            limiter,
            aggregator,
            config: Arc::new(config()),
            started: Instant::now(),
        }
    }

    #[tokio::test]
    async fn test_attempts_match_recorded() {
        let aggregator = Arc::new(Aggregator::new("worker"));
        let limiter = Arc::new(RequestLimiter::new(&config()));

        let attempts = worker(limiter, aggregator.clone()).run().await;

        assert!(attempts > 0);
        assert_eq!(aggregator.finish().total(), attempts);
    }

    #[tokio::test]
    async fn test_closed_permit_pool_sends_nothing() {
        let aggregator = Arc::new(Aggregator::new("worker"));
        let limiter = Arc::new(RequestLimiter::new(&config()));
        limiter.close();

        let attempts = worker(limiter, aggregator.clone()).run().await;

        assert_eq!(attempts, 0);
        assert_eq!(aggregator.finish().total(), 0);
    }
}
