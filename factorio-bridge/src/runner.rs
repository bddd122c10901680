//! Bridge assembly: wires storage, Docker control, RCON, the router, the
//! stream supervisor, and the Telegram loop, then runs until interrupted.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bridge_core::{init_tracing, ChannelSender, TelegramSender};
use storage::SettingsRepository;
use teloxide::Bot;
use tracing::info;

use crate::config::BridgeConfig;
use crate::console::{GameConsole, RconConsole};
use crate::control::{DockerControl, ServerControl};
use crate::lifecycle::LifecycleController;
use crate::relay::InboundRelay;
use crate::router::BroadcastRouter;
use crate::supervisor::StreamSupervisor;
use crate::telegram::{run_repl, Bridge};

pub async fn run_bridge(config: BridgeConfig) -> Result<()> {
    ensure_parent_dir(&config.log_file)?;
    ensure_parent_dir(&config.database_url)?;
    init_tracing(&config.log_file)?;

    info!(
        container = %config.container_name,
        database_url = %config.database_url,
        allowed_chats = ?config.allowed_chats,
        "Starting Factorio bridge"
    );

    let settings = SettingsRepository::new(&config.database_url)
        .await
        .context("Failed to open settings store")?;

    let bot = Bot::new(config.bot_token.clone());
    let sender: Arc<dyn ChannelSender> = Arc::new(TelegramSender::new(bot.clone()));
    let control: Arc<dyn ServerControl> = Arc::new(
        DockerControl::new(config.container_name.clone())
            .context("Failed to connect to the Docker daemon")?,
    );
    let console: Arc<dyn GameConsole> = Arc::new(RconConsole::new(
        config.rcon_host.clone(),
        config.rcon_port,
        config.rcon_password.clone(),
    ));

    let router = Arc::new(BroadcastRouter::new(settings.clone(), Arc::clone(&sender)));
    let supervisor = Arc::new(StreamSupervisor::new(Arc::clone(&control), router));
    let lifecycle = LifecycleController::new(
        Arc::clone(&supervisor),
        Arc::clone(&control),
        Duration::from_secs(config.restart_grace_secs),
    );
    let relay = InboundRelay::new(settings.clone(), console);

    let bridge = Arc::new(Bridge {
        settings,
        relay,
        lifecycle,
        sender,
        allowed_chats: config.allowed_chats.clone(),
    });

    supervisor.start().await;
    run_repl(bot, bridge).await;

    supervisor.stop().await;
    info!("Bridge stopped");
    Ok(())
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
