use anyhow::Context;
use occasio_web::{config::Config, start_server};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenv::dotenv();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::load().context("Environment misconfigured")?;
    start_server(config).await.context("Server failed")?;
    Ok(())
}
