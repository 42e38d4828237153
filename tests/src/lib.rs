//! Shared fixtures for the end to end tests.
use logbench_core::RunConfig;
use mock_service::{MockConfig, MockService};
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;
use url::Url;

/// Start a mock logging service on an ephemeral port.
pub async fn start_mock() -> MockService {
    mock_service::spawn(MockConfig::default())
        .await
        .expect("mock service failed to bind")
}

pub fn base_url(mock: &MockService) -> Url {
    Url::parse(&mock.base_url()).expect("mock address is a valid URL")
}

/// Short, light run parameters on top of the given workload defaults.
pub fn quick(mut config: RunConfig, concurrency: usize, tps: u32) -> RunConfig {
    config.duration = Duration::from_secs(1);
    config.timeout = Duration::from_secs(2);
    config.concurrency = NonZeroUsize::new(concurrency).expect("non-zero concurrency");
    config.tps = NonZeroU32::new(tps).expect("non-zero tps");
    config
}
