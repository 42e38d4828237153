use logbench::prelude::*;
use logbench::suite::{run_write, WritePlan};
use logbench_tests::{base_url, quick, start_mock};
use mock_service::MockService;

fn plan(mock: &MockService, api_key: &str) -> WritePlan {
    let base_url = base_url(mock);
    WritePlan {
        config: quick(RunConfig::write(base_url.as_str()), 4, 40),
        base_url,
        project_id: "6a5aec3c-8078-4e37-9c7c-139dddd5fa3a".to_string(),
        api_key: api_key.to_string(),
        searchable_keys: vec!["folan1".to_string(), "folan2".to_string()],
    }
}

#[tracing_test::traced_test]
#[tokio::test]
async fn generated_events_are_accepted() {
    let mock = start_mock().await;

    let stats = run_write(plan(&mock, "test-api-key")).await.unwrap();

    assert!(stats.target.ends_with("/api/projects/6a5aec3c-8078-4e37-9c7c-139dddd5fa3a/logs"));
    assert!(stats.total > 0);
    assert_eq!(stats.success, stats.total);
    assert_eq!(stats.failure, 0);
    assert!(stats.latency_p99.is_some());
    assert_eq!(mock.write_hits(), stats.total);
    assert_eq!(mock.login_hits(), 0);
}

#[tracing_test::traced_test]
#[tokio::test]
async fn wrong_api_key_counts_every_request_as_failure() {
    let mock = start_mock().await;

    let stats = run_write(plan(&mock, "not-the-key")).await.unwrap();

    assert!(stats.total > 0);
    assert_eq!(stats.success, 0);
    assert_eq!(stats.failure, stats.total);
    assert_eq!(stats.failures.status_mismatch, stats.total);
    assert_eq!(stats.error_rate, Some(1.0));
    assert!(stats.mean_latency.is_none());
    assert!(stats.throughput.is_none());

    let text = Report(&stats).to_string();
    assert!(!text.contains("Avg Latency"));
    assert!(!text.contains("Response Rate"));
}
