use logbench::prelude::*;
use logbench_tests::{base_url, quick, start_mock};
use std::time::Duration;
use url::Url;

#[tracing_test::traced_test]
#[tokio::test]
async fn slow_endpoint_times_out() {
    let mock = start_mock().await;
    let url = base_url(&mock).join("/delay/ms/2000").unwrap();
    let mut config = quick(RunConfig::read(url.as_str()), 5, 50);
    config.timeout = Duration::from_millis(100);

    let stats = Bench::with_config(config, ReadWorkload::new(reqwest::Client::new(), url)).await;

    assert!(stats.total > 0);
    assert_eq!(stats.success, 0);
    assert_eq!(stats.failure, stats.total);
    assert_eq!(stats.failures.timeout, stats.total);
    assert!(stats.mean_latency.is_none());
    assert!(stats.max_latency.is_none());
    assert!(stats.throughput.is_none());

    let text = Report(&stats).to_string();
    assert!(text.contains(&format!("timeout: {}", stats.total)));
    assert!(!text.contains("Avg Latency"));
}

#[tracing_test::traced_test]
#[tokio::test]
async fn refused_connections_are_failures() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let url = Url::parse(&format!("http://{addr}/api/projects/p1/logs")).unwrap();

    let stats = Bench::new(url.as_str(), ReadWorkload::new(reqwest::Client::new(), url.clone()))
        .config(quick(RunConfig::read(url.as_str()), 2, 20))
        .await;

    assert!(stats.total > 0);
    assert_eq!(stats.failures.connection, stats.total);
    assert_eq!(stats.success, 0);
}

#[tracing_test::traced_test]
#[tokio::test]
async fn overloaded_server_yields_mixed_outcomes() {
    let mock = start_mock().await;
    let url = base_url(&mock).join("/limited/5").unwrap();

    let stats = Bench::new(url.as_str(), ReadWorkload::new(reqwest::Client::new(), url.clone()))
        .config(quick(RunConfig::read(url.as_str()), 5, 50))
        .await;

    assert!(stats.success > 0, "{stats:?}");
    assert!(stats.failures.status_mismatch > 0, "{stats:?}");
    assert_eq!(stats.total, stats.success + stats.failure);
    assert_eq!(mock.other_hits(), stats.total);
}
