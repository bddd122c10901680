//! Binary for the Factorio ↔ Telegram bridge.

use anyhow::Result;
use clap::Parser;
use factorio_bridge::{run_bridge, BridgeConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BridgeConfig::load(token)?;
            run_bridge(config).await
        }
    }
}
