//! Long-polling update loop.
//!
//! Each update is reduced to an [`InboundUpdate`] and handled on its own
//! task, so a slow restart command never stalls the poll loop. Updates from
//! chats outside the allow-list are logged and dropped before any handling.

use std::sync::Arc;

use bridge_core::AttachmentKind;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::info;

use crate::telegram::handlers::{handle_update, Bridge, InboundUpdate};

pub async fn run_repl(bot: Bot, bridge: Arc<Bridge>) {
    info!("Starting Telegram update loop");
    teloxide::repl(bot, move |_bot: Bot, msg: Message| {
        let bridge = Arc::clone(&bridge);
        async move {
            let Some(update) = extract_update(&msg) else {
                return Ok(());
            };
            if !bridge.is_allowed(update.chat_id) {
                info!(
                    chat_id = update.chat_id,
                    user_id = update.user_id,
                    "Dropping update from chat outside the allow-list"
                );
                return Ok(());
            }
            tokio::spawn(async move {
                handle_update(bridge, update).await;
            });
            Ok(())
        }
    })
    .await;
}

/// Reduces a Telegram message to bridge terms. Returns `None` for updates
/// with no identifiable sender (channel posts, service messages).
fn extract_update(msg: &Message) -> Option<InboundUpdate> {
    let from = msg.from.as_ref()?;
    let platform_name = from
        .username
        .clone()
        .unwrap_or_else(|| from.first_name.clone());

    Some(InboundUpdate {
        chat_id: msg.chat.id.0,
        user_id: from.id.0 as i64,
        platform_name,
        text: msg.text().or_else(|| msg.caption()).map(str::to_string),
        attachment: attachment_kind(msg),
    })
}

fn attachment_kind(msg: &Message) -> AttachmentKind {
    if msg.photo().is_some() {
        AttachmentKind::Image
    } else if msg.video().is_some() {
        AttachmentKind::Video
    } else if msg.document().is_some() {
        AttachmentKind::File
    } else if msg.sticker().is_some() {
        AttachmentKind::Sticker
    } else if msg.voice().is_some() {
        AttachmentKind::Voice
    } else if msg.audio().is_some() {
        AttachmentKind::Audio
    } else if msg.contact().is_some() {
        AttachmentKind::Contact
    } else if msg.location().is_some() {
        AttachmentKind::Location
    } else if msg.poll().is_some() {
        AttachmentKind::Poll
    } else {
        AttachmentKind::None
    }
}
