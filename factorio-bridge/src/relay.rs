//! Inbound relay: Telegram message → game chat.
//!
//! Resolves the sender's stored profile (falling back to the platform name
//! and default color), formats the line, and speaks it through the console
//! client. Failures come back to the caller so the dispatcher can show the
//! sender a failure notice; they never take down the update loop.

use std::sync::Arc;

use bridge_core::{format_inbound, AttachmentKind, BridgeError, Result, DEFAULT_COLOR};
use storage::SettingsRepository;
use tracing::info;

use crate::console::GameConsole;

pub struct InboundRelay {
    settings: SettingsRepository,
    console: Arc<dyn GameConsole>,
}

impl InboundRelay {
    pub fn new(settings: SettingsRepository, console: Arc<dyn GameConsole>) -> Self {
        Self { settings, console }
    }

    /// Forwards one message into the game. `platform_name` is used when the
    /// sender has no stored profile.
    pub async fn relay(
        &self,
        sender_id: i64,
        platform_name: &str,
        text: Option<&str>,
        attachment: AttachmentKind,
    ) -> Result<()> {
        let profile = self
            .settings
            .get_user(sender_id)
            .await
            .map_err(|e| BridgeError::Database(e.to_string()))?;

        let (name, color) = match profile {
            Some(profile) => (profile.display_name, profile.color),
            None => (platform_name.to_string(), DEFAULT_COLOR.to_string()),
        };

        let body = format_inbound(&name, text, attachment);
        info!(sender_id, body = %body, "Relaying message to game");

        self.console.say(&body, &color).await
    }
}
