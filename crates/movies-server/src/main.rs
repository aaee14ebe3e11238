use movies_server::{config::ServerConfig, run::run, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,movies_app=debug,movies_dal=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let args = ServerConfig::load()?;
    run(args).await
}
