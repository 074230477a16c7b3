use mock_service::MockConfig;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=debug,tower_http=info")),
        )
        .init();

    let addr: SocketAddr = "0.0.0.0:5154".parse()?;
    println!("Mock service listening on {addr}");
    mock_service::run(addr, MockConfig::default()).await
}
