use mock_service::{tps_measure_task, MockConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("mock_service=debug,tower_http=info")
        .init();

    let addr: SocketAddr = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8084)));

    let service = Arc::new(mock_service::serve(addr, MockConfig::default()).await?);
    println!("Mock logging service on {}", service.base_url());
    tps_measure_task(service).await;
    Ok(())
}
