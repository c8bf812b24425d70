//! Holdwatch entry point.

use anyhow::Result;
use clap::Parser;
use holdwatch_bot::{AppConfig, Application, Secrets};
use tracing::{info, warn};

/// Telegram watchdog for Binance futures position holding times
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via HOLDWATCH_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Secrets may live in .env during development
    dotenvy::dotenv().ok();

    let config_path = AppConfig::resolve_path(args.config);
    let (config, found) = AppConfig::load(&config_path)?;

    holdwatch_telemetry::init_logging_with(Some(&config.telemetry.log_level))?;
    info!("Starting Holdwatch v{}", env!("CARGO_PKG_VERSION"));
    if found {
        info!(config_path = %config_path, "Configuration loaded");
    } else {
        warn!(config_path = %config_path, "Config file not found, using defaults");
    }

    let secrets = Secrets::from_env()?;
    info!(?secrets, rest_url = %config.exchange.rest_url, "Credentials loaded");

    Application::new(config, secrets).run().await?;

    Ok(())
}
