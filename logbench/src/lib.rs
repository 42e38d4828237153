#![doc = include_str!("../README.md")]

pub mod auth;
pub mod bench;
pub mod cli;
pub mod error;
pub mod payload;
pub mod report;
pub mod suite;
pub mod workload;

pub(crate) mod aggregator;
pub(crate) mod limiter;
pub(crate) mod worker;

pub use bench::{Bench, ConfigurableBench};
pub use logbench_core as core;

#[cfg(feature = "metrics")]
pub(crate) const REQUESTS_METRIC: &str = "logbench_requests_total";
#[cfg(feature = "metrics")]
pub(crate) const LATENCY_METRIC: &str = "logbench_request_latency_seconds";

pub mod prelude {
    pub use crate::auth::{Credentials, Session};
    pub use crate::bench::{Bench, ConfigurableBench};
    pub use crate::report::Report;
    pub use crate::workload::{ReadWorkload, Workload, WriteWorkload};
    pub use logbench_core::{RunConfig, RunStatistics};
}
