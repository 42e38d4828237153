//! End to end benchmark of the logging service's read and write paths.
//!
//! Each suite authenticates once, then benchmarks its endpoints one after another, emitting a
//! report after every run. A failed handshake returns before any worker is spawned.
use crate::auth::{Credentials, Session};
use crate::bench::Bench;
use crate::error::SetupError;
use crate::payload::PayloadGenerator;
use crate::report;
use crate::workload::{ReadWorkload, WriteWorkload};
use logbench_core::{RunConfig, RunStatistics};
use tracing::info;
use url::Url;

#[derive(Clone, Debug)]
pub struct ReadPlan {
    pub base_url: Url,
    pub project_id: String,
    pub username: String,
    pub password: String,
    /// Query string for the filtered logs endpoint, without the leading `?`.
    pub search_query: Option<String>,
    /// Load parameters. The target is replaced per endpoint.
    pub config: RunConfig,
}

#[derive(Clone, Debug)]
pub struct WritePlan {
    pub base_url: Url,
    pub project_id: String,
    pub api_key: String,
    pub searchable_keys: Vec<String>,
    pub config: RunConfig,
}

/// Resolve `path` below `base_url`, keeping any path prefix the base carries.
fn endpoint(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path)
}

pub fn login_url(base_url: &Url) -> Result<Url, url::ParseError> {
    endpoint(base_url, "api/auth/login")
}

/// Aggregated view first, then the filtered log listing.
pub fn read_urls(
    base_url: &Url,
    project_id: &str,
    search_query: Option<&str>,
) -> Result<Vec<Url>, url::ParseError> {
    let aggregated = endpoint(base_url, &format!("api/projects/{project_id}/logs/aggregated"))?;
    let mut logs = endpoint(base_url, &format!("api/projects/{project_id}/logs"))?;
    logs.set_query(search_query.filter(|q| !q.is_empty()));
    Ok(vec![aggregated, logs])
}

pub fn ingest_url(base_url: &Url, project_id: &str) -> Result<Url, url::ParseError> {
    endpoint(base_url, &format!("api/projects/{project_id}/logs"))
}

pub async fn run_read(plan: ReadPlan) -> Result<Vec<RunStatistics>, SetupError> {
    let urls = read_urls(
        &plan.base_url,
        &plan.project_id,
        plan.search_query.as_deref(),
    )?;
    let credentials = Credentials::Login {
        url: login_url(&plan.base_url)?,
        username: plan.username,
        password: plan.password,
    };
    let session = Session::establish(&credentials).await?;

    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        let config = plan.config.with_target(url.as_str());
        let workload = ReadWorkload::new(session.client().clone(), url);
        let stats = Bench::with_config(config, workload).await;
        report::emit(&stats);
        results.push(stats);
    }

    info!("Read benchmark finished");
    Ok(results)
}

pub async fn run_write(plan: WritePlan) -> Result<RunStatistics, SetupError> {
    let url = ingest_url(&plan.base_url, &plan.project_id)?;
    let session = Session::establish(&Credentials::ApiKey(plan.api_key)).await?;

    let config = plan.config.with_target(url.as_str());
    let workload = WriteWorkload::new(
        session.client().clone(),
        url,
        PayloadGenerator::new(&plan.searchable_keys[..]),
    );
    let stats = Bench::with_config(config, workload).await;
    report::emit(&stats);

    info!("Write benchmark finished");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let base = Url::parse("http://localhost:8084").unwrap();
        assert_eq!(
            login_url(&base).unwrap().as_str(),
            "http://localhost:8084/api/auth/login"
        );
        assert_eq!(
            ingest_url(&base, "p1").unwrap().as_str(),
            "http://localhost:8084/api/projects/p1/logs"
        );

        let query = "event_name=&search_keys=folan1%3Auser-3630";
        let urls = read_urls(&base, "p1", Some(query)).unwrap();
        assert_eq!(
            urls[0].as_str(),
            "http://localhost:8084/api/projects/p1/logs/aggregated"
        );
        assert_eq!(
            urls[1].as_str(),
            "http://localhost:8084/api/projects/p1/logs?event_name=&search_keys=folan1%3Auser-3630"
        );

        let urls = read_urls(&base, "p1", Some("")).unwrap();
        assert_eq!(urls[1].as_str(), "http://localhost:8084/api/projects/p1/logs");
        let urls = read_urls(&base, "p1", None).unwrap();
        assert!(urls[1].query().is_none());
    }

    #[test]
    fn test_base_path_prefix_kept() {
        for base in ["http://gw.local/logsvc/", "http://gw.local/logsvc"] {
            let base = Url::parse(base).unwrap();
            assert_eq!(
                login_url(&base).unwrap().as_str(),
                "http://gw.local/logsvc/api/auth/login"
            );
            assert_eq!(
                ingest_url(&base, "p1").unwrap().as_str(),
                "http://gw.local/logsvc/api/projects/p1/logs"
            );
            let urls = read_urls(&base, "p1", Some("event_name=e")).unwrap();
            assert_eq!(
                urls[0].as_str(),
                "http://gw.local/logsvc/api/projects/p1/logs/aggregated"
            );
            assert_eq!(
                urls[1].as_str(),
                "http://gw.local/logsvc/api/projects/p1/logs?event_name=e"
            );
        }
    }
}
