//! Shared helpers for the integration tests.
use mock_service::{MockConfig, MockService};
use std::sync::OnceLock;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use volley::core::Credentials;

pub const ACCOUNT: (&str, &str) = ("bench@volley.test", "volley");

pub fn init_tracing() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::new("volley=debug,mock_service=debug"))
            .with_test_writer()
            .try_init();
    });
}

/// Start a mock target with the default account on an ephemeral port.
pub async fn target() -> anyhow::Result<MockService> {
    target_with(MockConfig::default()).await
}

pub async fn target_with(config: MockConfig) -> anyhow::Result<MockService> {
    init_tracing();
    mock_service::spawn(config).await
}

pub fn valid_credentials() -> Credentials {
    Credentials::new(ACCOUNT.0, ACCOUNT.1)
}

/// An address nothing listens on.
pub async fn closed_port_url() -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
