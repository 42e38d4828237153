use clap::Parser;
use logbench::cli::Cli;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("logbench=info")),
        )
        .init();

    let cli = Cli::parse();

    #[cfg(feature = "metrics")]
    if let Some(addr) = cli.prometheus {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
    }

    logbench::cli::execute(cli.command).await?;
    Ok(())
}
