//! Settings models: one row per subscribed channel, one row per user profile.
//!
//! Map to the `channel_settings` and `user_settings` tables; used by
//! SettingsRepository.

use serde::{Deserialize, Serialize};

/// A Telegram chat that receives game events. `broadcast_enabled` gates
/// in-game chat messages only; join/leave notices are always delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChannelSubscription {
    pub channel_id: i64,
    pub broadcast_enabled: bool,
}

/// Per-user display settings for messages relayed into the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: i64,
    pub display_name: String,
    /// Hex-like color tag, e.g. `#FF0000`.
    pub color: String,
}
