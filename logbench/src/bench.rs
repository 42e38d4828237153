//! Worker pool orchestration for a single endpoint.
use crate::aggregator::Aggregator;
use crate::limiter::RequestLimiter;
use crate::worker::Worker;
use crate::workload::Workload;
use logbench_core::{RunConfig, RunStatistics};
use std::{
    future::Future,
    num::{NonZeroU32, NonZeroUsize},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// A benchmark run against one endpoint.
///
/// Configure it through [`ConfigurableBench`] and `.await` it to run the pool and get the
/// summary back.
///
/// # Example
/// ```no_run
/// use logbench::prelude::*;
/// use std::num::{NonZeroU32, NonZeroUsize};
/// use std::time::Duration;
///
/// # async fn demo(client: reqwest::Client, url: url::Url) {
/// let stats = Bench::new(url.as_str(), ReadWorkload::new(client, url.clone()))
///     .tps(NonZeroU32::new(700).unwrap())
///     .concurrency(NonZeroUsize::new(100).unwrap())
///     .duration(Duration::from_secs(10))
///     .await;
/// println!("{}", Report(&stats));
/// # }
/// ```
#[pin_project::pin_project]
pub struct Bench<W> {
    workload: Option<W>,
    runner_fut: Option<Pin<Box<dyn Future<Output = RunStatistics> + Send>>>,
    config: RunConfig,
}

impl<W: Workload> Bench<W> {
    /// Run with the read workload defaults, see [`RunConfig::read`].
    pub fn new(target: &str, workload: W) -> Self {
        Self::with_config(RunConfig::read(target), workload)
    }

    pub fn with_config(config: RunConfig, workload: W) -> Self {
        Self {
            workload: Some(workload),
            runner_fut: None,
            config,
        }
    }
}

impl<W: Workload> Future for Bench<W> {
    type Output = RunStatistics;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if this.runner_fut.is_none() {
            if let Some(workload) = this.workload.take() {
                let config = this.config.clone();
                *this.runner_fut = Some(Box::pin(run_pool(workload, config)));
            }
        }

        match this.runner_fut {
            Some(runner) => runner.as_mut().poll(cx),
            None => unreachable!("Bench polled after completion"),
        }
    }
}

pub trait ConfigurableBench: Future<Output = RunStatistics> + Sized + Send {
    fn tps(self, tps: NonZeroU32) -> Self;
    fn concurrency(self, concurrency: NonZeroUsize) -> Self;
    fn duration(self, duration: Duration) -> Self;
    fn timeout(self, timeout: Duration) -> Self;
    fn expect_status(self, status: u16) -> Self;
    fn config(self, config: RunConfig) -> Self;
}

impl<W: Workload> ConfigurableBench for Bench<W> {
    /// Target requests per second, shared by all workers.
    fn tps(mut self, tps: NonZeroU32) -> Self {
        self.config.tps = tps;
        self
    }

    /// Number of concurrent workers.
    fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// How long workers keep starting new requests.
    fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Per request timeout. A timed out request counts as a failure.
    fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// The only status code counted as a success.
    fn expect_status(mut self, status: u16) -> Self {
        self.config.expected_status = status;
        self
    }

    /// Replace the whole configuration.
    fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }
}

#[instrument(name = "run", skip_all, fields(target = %config.target))]
pub(crate) async fn run_pool<W: Workload>(mut workload: W, config: RunConfig) -> RunStatistics {
    info!("Running {} with config {:?}", config.target, &config);

    #[cfg(feature = "metrics")]
    {
        metrics::describe_counter!(crate::REQUESTS_METRIC, "Completed request attempts");
        metrics::describe_histogram!(
            crate::LATENCY_METRIC,
            metrics::Unit::Seconds,
            "Request round trip time"
        );
    }

    let config = Arc::new(config);
    let limiter = Arc::new(RequestLimiter::new(&config));
    let aggregator = Arc::new(Aggregator::new(&config.target));

    let started = Instant::now();
    let tasks: Vec<_> = (0..config.concurrency.get())
        .map(|id| {
            let worker = Worker {
                id,
                workload: workload.fork(),
                config: config.clone(),
                limiter: limiter.clone(),
                aggregator: aggregator.clone(),
                started,
            };
            tokio::spawn(worker.run().in_current_span())
        })
        .collect();

    let mut attempts = 0;
    for handle in tasks {
        match handle.await {
            Ok(count) => attempts += count,
            Err(err) => error!("Worker task failed: {err}"),
        }
    }
    let elapsed = started.elapsed();

    let stats = aggregator.finish();
    if stats.total() != attempts {
        warn!(
            "Recorded {} outcomes for {attempts} attempts",
            stats.total()
        );
    }

    info!(
        "Run complete in {}",
        humantime::format_duration(round_to_millis(elapsed))
    );
    stats.summarize(&config.target, elapsed)
}

fn round_to_millis(dur: Duration) -> Duration {
    Duration::from_millis(dur.as_millis() as u64)
}
