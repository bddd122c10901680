//! Outbound channel client abstraction.
//!
//! [`ChannelSender`] is transport-agnostic; [`TelegramSender`] implements it
//! via teloxide. The router and command handlers depend only on the trait, so
//! tests substitute a recording implementation.

use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

/// Rich-text mode for an outbound message. The bridge only ever needs bold,
/// so HTML is the one rich mode supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupMode {
    Plain,
    Html,
}

/// Sends text to one channel. A destination that is no longer reachable
/// surfaces as [`BridgeError::Delivery`] rather than a panic.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, channel_id: i64, text: &str, markup: MarkupMode) -> Result<()>;
}

/// Teloxide-based implementation of [`ChannelSender`].
pub struct TelegramSender {
    bot: teloxide::Bot,
}

impl TelegramSender {
    /// Creates a sender from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChannelSender for TelegramSender {
    async fn send(&self, channel_id: i64, text: &str, markup: MarkupMode) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(channel_id), text);
        if markup == MarkupMode::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        request.await.map_err(|e| BridgeError::Delivery {
            channel_id,
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
