//! Broadcast router: fans one parsed event out to subscribed chats.
//!
//! Destination selection is pure ([`route`]); delivery is sequential so that
//! per-channel message order matches event arrival order. A destination that
//! fails is logged and skipped; the remaining destinations still get the
//! message.

use std::sync::Arc;

use bridge_core::{format_chat_line, ChannelSender, EventKind, GameEvent, MarkupMode, OutboundMessage};
use storage::{ChannelSubscription, SettingsRepository};
use tracing::{error, info, warn};

/// Selects destinations and builds message bodies for one event.
///
/// Join/Leave target every subscription with the payload verbatim; Chat
/// targets only broadcast-enabled subscriptions with the formatted line;
/// Unknown targets nothing.
pub fn route(event: &GameEvent, subscriptions: &[ChannelSubscription]) -> Vec<OutboundMessage> {
    match event.kind {
        EventKind::Unknown => Vec::new(),
        EventKind::Join | EventKind::Leave => subscriptions
            .iter()
            .map(|sub| OutboundMessage {
                channel_id: sub.channel_id,
                body: event.payload.clone(),
                is_chat: false,
            })
            .collect(),
        EventKind::Chat => {
            let body = format_chat_line(&event.payload);
            subscriptions
                .iter()
                .filter(|sub| sub.broadcast_enabled)
                .map(|sub| OutboundMessage {
                    channel_id: sub.channel_id,
                    body: body.clone(),
                    is_chat: true,
                })
                .collect()
        }
    }
}

/// Reads the subscription table and dispatches one event to every selected
/// destination.
pub struct BroadcastRouter {
    settings: SettingsRepository,
    sender: Arc<dyn ChannelSender>,
}

impl BroadcastRouter {
    pub fn new(settings: SettingsRepository, sender: Arc<dyn ChannelSender>) -> Self {
        Self { settings, sender }
    }

    pub async fn dispatch(&self, event: &GameEvent) {
        if event.kind == EventKind::Unknown {
            return;
        }

        let subscriptions = match self.settings.list_channels().await {
            Ok(subs) => subs,
            Err(e) => {
                error!(error = %e, "Failed to list subscribed channels");
                return;
            }
        };

        let messages = route(event, &subscriptions);
        info!(
            kind = ?event.kind,
            destinations = messages.len(),
            "Broadcasting event"
        );

        for message in messages {
            // Only chat bodies carry markup; presence text is sent verbatim
            // so player names cannot be misread as HTML.
            let markup = if message.is_chat {
                MarkupMode::Html
            } else {
                MarkupMode::Plain
            };
            if let Err(e) = self
                .sender
                .send(message.channel_id, &message.body, markup)
                .await
            {
                warn!(
                    channel_id = message.channel_id,
                    error = %e,
                    "Delivery failed, skipping channel"
                );
            }
        }
    }
}
