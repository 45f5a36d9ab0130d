//! API server entry point.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use facto_core::FactoConfig;
use facto_server::{start_server, ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("FACTO_CONFIG") {
        Ok(path) => FactoConfig::from_file(Path::new(&path))?,
        Err(_) => FactoConfig::default(),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{port}");

    start_server(&addr, ApiState::new(config)).await?;
    Ok(())
}
