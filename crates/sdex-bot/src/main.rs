//! SDEX market-making agent - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

use sdex_bot::LoopExit;

/// SDEX market-making agent
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SDEX_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    sdex_telemetry::init_logging()?;

    info!("Starting SDEX agent v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > SDEX_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("SDEX_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = sdex_bot::AppConfig::from_file(&config_path)?;
    info!(pair = %config.pair, strategy = config.strategy.name(), "Configuration loaded");

    let app = sdex_bot::Application::new(config)?;

    match app.run().await? {
        LoopExit::Completed => info!("Strategy completed, exiting"),
        LoopExit::Interrupted => info!("Interrupted, exiting"),
    }

    Ok(())
}
