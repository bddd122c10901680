//! Settings repository: channel subscriptions and user profiles.
//!
//! Uses SqlitePoolManager and the models (ChannelSubscription, UserProfile).
//! External: SQLite via sqlx. Each operation is a single statement, so it is
//! atomic on its own; callers must not assume cross-operation transactions.

use crate::error::StorageError;
use crate::models::{ChannelSubscription, UserProfile};
use crate::sqlite_pool::SqlitePoolManager;
use tracing::info;

#[derive(Clone)]
pub struct SettingsRepository {
    pool_manager: SqlitePoolManager,
}

impl SettingsRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating settings tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channel_settings (
                channel_id INTEGER PRIMARY KEY,
                broadcast_enabled BOOLEAN NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_settings (
                user_id INTEGER PRIMARY KEY,
                display_name TEXT NOT NULL,
                color TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts or replaces the subscription row for a channel. Subscribing an
    /// already-subscribed channel just overwrites the flag.
    pub async fn upsert_channel(
        &self,
        channel_id: i64,
        broadcast_enabled: bool,
    ) -> Result<(), StorageError> {
        sqlx::query("INSERT OR REPLACE INTO channel_settings VALUES (?, ?)")
            .bind(channel_id)
            .bind(broadcast_enabled)
            .execute(self.pool_manager.pool())
            .await?;

        info!(channel_id, broadcast_enabled, "Saved channel subscription");
        Ok(())
    }

    /// Removes a channel's subscription. Returns whether a row was deleted.
    pub async fn delete_channel(&self, channel_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM channel_settings WHERE channel_id = ?")
            .bind(channel_id)
            .execute(self.pool_manager.pool())
            .await?;

        info!(channel_id, "Deleted channel subscription");
        Ok(result.rows_affected() > 0)
    }

    /// Lists every subscribed channel; read by the router on every event.
    pub async fn list_channels(&self) -> Result<Vec<ChannelSubscription>, StorageError> {
        let channels = sqlx::query_as::<_, ChannelSubscription>(
            "SELECT channel_id, broadcast_enabled FROM channel_settings",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(channels)
    }

    /// Inserts or replaces a user's display profile.
    pub async fn upsert_user(
        &self,
        user_id: i64,
        display_name: &str,
        color: &str,
    ) -> Result<(), StorageError> {
        sqlx::query("INSERT OR REPLACE INTO user_settings VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(display_name)
            .bind(color)
            .execute(self.pool_manager.pool())
            .await?;

        info!(user_id, display_name, color, "Saved user profile");
        Ok(())
    }

    /// Looks up a user's profile; `None` means the caller should fall back to
    /// the platform-supplied name and the default color.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserProfile>, StorageError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, display_name, color FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(profile)
    }
}
