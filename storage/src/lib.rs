//! Storage crate: durable bridge settings.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – ChannelSubscription, UserProfile
//! - [`settings_repo`] – SettingsRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod settings_repo;
mod sqlite_pool;


pub use error::StorageError;
pub use models::{ChannelSubscription, UserProfile};
pub use settings_repo::SettingsRepository;
pub use sqlite_pool::SqlitePoolManager;
