//! Binary entrypoint for the Pantry API server.
use pantry_api::{config::ApiConfig, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // File named by PANTRY_CONFIG, overridden by PANTRY_ADDR, WEATHER_API_KEY, ...
    let config = ApiConfig::from_env()?;
    run(config).await
}
