//! Command execution and per-update dispatch.

use std::sync::Arc;

use bridge_core::{AttachmentKind, ChannelSender, MarkupMode};
use storage::SettingsRepository;
use tracing::{error, info, warn};

use crate::lifecycle::LifecycleController;
use crate::relay::InboundRelay;
use crate::telegram::commands::{self, Command, CommandParse};

/// One incoming Telegram message, reduced to what the bridge needs. Owned so
/// it can cross into a spawned task.
#[derive(Debug, Clone)]
pub struct InboundUpdate {
    pub chat_id: i64,
    pub user_id: i64,
    /// Telegram username, or first name when the sender has none.
    pub platform_name: String,
    pub text: Option<String>,
    pub attachment: AttachmentKind,
}

/// Everything the update loop needs, bundled for sharing across tasks.
pub struct Bridge {
    pub settings: SettingsRepository,
    pub relay: InboundRelay,
    pub lifecycle: LifecycleController,
    pub sender: Arc<dyn ChannelSender>,
    pub allowed_chats: Vec<i64>,
}

impl Bridge {
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.contains(&chat_id)
    }

    /// Runs one command and returns the reply text for the chat.
    pub async fn execute(&self, chat_id: i64, user_id: i64, command: Command) -> String {
        match command {
            Command::Start => match self.settings.upsert_channel(chat_id, false).await {
                Ok(()) => {
                    "Chat added. Type /enable_messages to receive Factorio messages.".to_string()
                }
                Err(e) => {
                    error!(error = %e, chat_id, "Failed to subscribe chat");
                    "Failed to update chat settings.".to_string()
                }
            },
            Command::Stop => match self.settings.delete_channel(chat_id).await {
                Ok(_) => "Chat deleted.".to_string(),
                Err(e) => {
                    error!(error = %e, chat_id, "Failed to unsubscribe chat");
                    "Failed to update chat settings.".to_string()
                }
            },
            Command::EnableMessages => match self.settings.upsert_channel(chat_id, true).await {
                Ok(()) => "Messages enabled.".to_string(),
                Err(e) => {
                    error!(error = %e, chat_id, "Failed to enable chat broadcasts");
                    "Failed to update chat settings.".to_string()
                }
            },
            Command::DisableMessages => match self.settings.upsert_channel(chat_id, false).await {
                Ok(()) => "Messages disabled.".to_string(),
                Err(e) => {
                    error!(error = %e, chat_id, "Failed to disable chat broadcasts");
                    "Failed to update chat settings.".to_string()
                }
            },
            Command::SetUser { name, color } => {
                match self.settings.upsert_user(user_id, &name, &color).await {
                    Ok(()) => format!("Username is set to '{name}'.\nColor is set to '{color}'."),
                    Err(e) => {
                        error!(error = %e, user_id, "Failed to store user profile");
                        "Failed to update user settings.".to_string()
                    }
                }
            }
            Command::RestartServer => {
                // Immediate acknowledgement; the restart takes a while.
                self.reply(chat_id, "Restarting...").await;
                match self.lifecycle.restart().await {
                    Ok(status) => format!("Server restarted. Status {status}"),
                    Err(e) => format!("Error during server restart: {e}"),
                }
            }
        }
    }

    pub async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.sender.send(chat_id, text, MarkupMode::Plain).await {
            warn!(error = %e, chat_id, "Failed to send reply");
        }
    }
}

/// Handles one update from an allowed chat: commands get a reply, everything
/// else is forwarded into the game.
pub async fn handle_update(bridge: Arc<Bridge>, update: InboundUpdate) {
    if let Some(text) = update.text.as_deref() {
        match commands::parse(text) {
            CommandParse::Recognized(command) => {
                info!(chat_id = update.chat_id, command = ?command, "Executing command");
                let reply = bridge
                    .execute(update.chat_id, update.user_id, command)
                    .await;
                bridge.reply(update.chat_id, &reply).await;
                return;
            }
            CommandParse::Malformed { usage } => {
                bridge.reply(update.chat_id, usage).await;
                return;
            }
            CommandParse::None => {}
        }
    }

    if update.text.is_none() && update.attachment == AttachmentKind::None {
        return;
    }

    if let Err(e) = bridge
        .relay
        .relay(
            update.user_id,
            &update.platform_name,
            update.text.as_deref(),
            update.attachment,
        )
        .await
    {
        error!(error = %e, user_id = update.user_id, "Failed to forward message to the game");
        bridge
            .reply(
                update.chat_id,
                "Failed to forward your message to the server.",
            )
            .await;
    }
}
