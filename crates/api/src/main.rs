//! PC Fault Diagnosis - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config file path as the first argument
    let config_path = std::env::args().nth(1);
    let config = AppConfig::load(config_path.as_deref())?;

    init_logging(&config.logging)?;

    info!("=== PC Fault Diagnosis v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Knowledge base: {}",
        config
            .engine
            .knowledge_base_path
            .as_deref()
            .unwrap_or("built-in")
    );

    run_server(config).await
}
