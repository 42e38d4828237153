//! Command line surface of the `logbench` binary.
use crate::error::SetupError;
use crate::payload::DEFAULT_SEARCHABLE_KEYS;
use crate::suite::{self, ReadPlan, WritePlan};
use clap::{Args, Parser, Subcommand};
use logbench_core::RunConfig;
#[cfg(feature = "metrics")]
use std::net::SocketAddr;
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8084";

#[derive(Parser, Debug)]
#[command(name = "logbench", version, about = "Load generator for the logging service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Serve Prometheus metrics on this address while benchmarking.
    #[cfg(feature = "metrics")]
    #[arg(long, global = true)]
    pub prometheus: Option<SocketAddr>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Benchmark the cookie-authenticated log query endpoints.
    Read(ReadArgs),
    /// Benchmark the API-key authenticated ingestion endpoint.
    Write(WriteArgs),
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// How long to keep issuing requests per endpoint, e.g. `10s`, `2m`.
    #[arg(short, long, value_parser = humantime::parse_duration, default_value = "10s")]
    pub duration: Duration,

    /// Number of concurrent workers. Defaults depend on the workload.
    #[arg(short, long)]
    pub concurrency: Option<NonZeroUsize>,

    /// Target requests per second. Defaults depend on the workload.
    #[arg(short, long)]
    pub tps: Option<NonZeroU32>,

    /// Per request timeout.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "10s")]
    pub timeout: Duration,
}

impl LoadArgs {
    fn apply(&self, mut config: RunConfig) -> RunConfig {
        config.duration = self.duration;
        config.timeout = self.timeout;
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(tps) = self.tps {
            config.tps = tps;
        }
        config
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    #[arg(long)]
    pub project_id: String,

    #[arg(short, long, env = "LOGBENCH_USERNAME")]
    pub username: String,

    #[arg(short, long, env = "LOGBENCH_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Query string for the filtered logs endpoint, e.g. `event_name=&search_keys=k%3Av`.
    #[arg(long)]
    pub search_query: Option<String>,

    #[command(flatten)]
    pub load: LoadArgs,
}

impl ReadArgs {
    pub fn into_plan(self) -> ReadPlan {
        let config = self.load.apply(RunConfig::read(self.base_url.as_str()));
        ReadPlan {
            base_url: self.base_url,
            project_id: self.project_id,
            username: self.username,
            password: self.password,
            search_query: self.search_query,
            config,
        }
    }
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    #[arg(long)]
    pub project_id: String,

    #[arg(long, env = "LOGBENCH_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Searchable key to fill with a random identifier. Repeat for several keys.
    #[arg(long = "searchable-key", default_values_t = DEFAULT_SEARCHABLE_KEYS.map(String::from))]
    pub searchable_keys: Vec<String>,

    #[command(flatten)]
    pub load: LoadArgs,
}

impl WriteArgs {
    pub fn into_plan(self) -> WritePlan {
        let config = self.load.apply(RunConfig::write(self.base_url.as_str()));
        WritePlan {
            base_url: self.base_url,
            project_id: self.project_id,
            api_key: self.api_key,
            searchable_keys: self.searchable_keys,
            config,
        }
    }
}

pub async fn execute(command: Command) -> Result<(), SetupError> {
    match command {
        Command::Read(args) => {
            suite::run_read(args.into_plan()).await?;
        }
        Command::Write(args) => {
            suite::run_write(args.into_plan()).await?;
        }
    }
    Ok(())
}
