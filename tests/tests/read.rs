use logbench::error::SetupError;
use logbench::prelude::*;
use logbench::suite::{read_urls, run_read, ReadPlan};
use logbench_tests::{base_url, quick, start_mock};
use mock_service::MockService;

const SEARCH_QUERY: &str =
    "event_name=&start_time=2025-07-14T21%3A09&end_time=2025-07-20T21%3A09&search_keys=folan1%3Auser-3630";

fn plan(mock: &MockService, password: &str) -> ReadPlan {
    let base_url = base_url(mock);
    ReadPlan {
        config: quick(RunConfig::read(base_url.as_str()), 2, 10),
        base_url,
        project_id: "6a5aec3c-8078-4e37-9c7c-139dddd5fa3a".to_string(),
        username: "bench".to_string(),
        password: password.to_string(),
        search_query: Some(SEARCH_QUERY.to_string()),
    }
}

#[tracing_test::traced_test]
#[tokio::test]
async fn read_endpoints_all_succeed() {
    let mock = start_mock().await;

    let runs = run_read(plan(&mock, "bench")).await.unwrap();

    assert_eq!(runs.len(), 2);
    assert!(runs[0].target.ends_with("/logs/aggregated"));
    assert!(runs[1].target.ends_with(&format!("/logs?{SEARCH_QUERY}")));
    for run in &runs {
        assert!(run.total > 0, "{run:?}");
        assert_eq!(run.success, run.total);
        assert_eq!(run.failure, 0);
        assert!(run.mean_latency.is_some());
        assert!(run.max_latency >= run.mean_latency);
        assert!(run.throughput.is_some());
    }

    assert_eq!(mock.login_hits(), 1);
    assert_eq!(
        mock.read_hits(),
        runs.iter().map(|run| run.total).sum::<u64>()
    );
}

#[tracing_test::traced_test]
#[tokio::test]
async fn rejected_login_spawns_no_workers() {
    let mock = start_mock().await;

    let err = run_read(plan(&mock, "wrong-password")).await.unwrap_err();

    assert!(
        matches!(err, SetupError::LoginRejected(status) if status.as_u16() == 401),
        "{err:?}"
    );
    assert_eq!(mock.login_hits(), 1);
    assert_eq!(mock.read_hits(), 0);
}

#[tracing_test::traced_test]
#[tokio::test]
async fn reads_without_session_are_failures() {
    let mock = start_mock().await;
    let url = read_urls(&base_url(&mock), "p1", None).unwrap().remove(0);

    let stats = Bench::new(url.as_str(), ReadWorkload::new(reqwest::Client::new(), url.clone()))
        .config(quick(RunConfig::read(url.as_str()), 2, 20))
        .await;

    assert!(stats.total > 0);
    assert_eq!(stats.success, 0);
    assert_eq!(stats.failures.status_mismatch, stats.total);
    assert!(stats.mean_latency.is_none());
    assert!(stats.throughput.is_none());
    assert!(!Report(&stats).to_string().contains("Avg Latency"));
}
