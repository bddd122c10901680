//! Bridge configuration, loaded from environment variables.

use anyhow::{anyhow, Context, Result};
use std::env;

/// All runtime settings: Telegram token, container name, RCON endpoint, the
/// chat allow-list, and paths.
pub struct BridgeConfig {
    pub bot_token: String,
    pub container_name: String,
    pub rcon_host: String,
    pub rcon_port: u16,
    pub rcon_password: String,
    /// Chat ids permitted to issue commands and relay messages.
    pub allowed_chats: Vec<i64>,
    pub database_url: String,
    pub log_file: String,
    /// Fixed wait after a container restart before reattaching to the log
    /// stream. Restart completion is not independently observable, so this is
    /// a delay rather than a health poll.
    pub restart_grace_secs: u64,
}

impl BridgeConfig {
    /// Loads the config from environment variables. If `token` is provided it
    /// overrides `BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow!("BOT_TOKEN not set"))?,
        };
        let container_name =
            env::var("CONTAINER_NAME").map_err(|_| anyhow!("CONTAINER_NAME not set"))?;
        let rcon_host = env::var("RCON_HOST").map_err(|_| anyhow!("RCON_HOST not set"))?;
        let rcon_port = env::var("RCON_PORT")
            .map_err(|_| anyhow!("RCON_PORT not set"))?
            .parse()
            .context("RCON_PORT must be a port number")?;
        let rcon_password =
            env::var("RCON_PASSWORD").map_err(|_| anyhow!("RCON_PASSWORD not set"))?;
        let allowed_chats: Vec<i64> = serde_json::from_str(
            &env::var("ALLOWED_CHATS").map_err(|_| anyhow!("ALLOWED_CHATS not set"))?,
        )
        .context("ALLOWED_CHATS must be a JSON array of chat ids")?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "db/settings.db".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/factorio-bridge.log".to_string());
        let restart_grace_secs = match env::var("RESTART_GRACE_SECS") {
            Ok(value) => value
                .parse()
                .context("RESTART_GRACE_SECS must be a number of seconds")?,
            Err(_) => 10,
        };

        Ok(Self {
            bot_token,
            container_name,
            rcon_host,
            rcon_port,
            rcon_password,
            allowed_chats,
            database_url,
            log_file,
            restart_grace_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_env() {
        env::set_var("BOT_TOKEN", "test_token");
        env::set_var("CONTAINER_NAME", "factorio");
        env::set_var("RCON_HOST", "127.0.0.1");
        env::set_var("RCON_PORT", "27015");
        env::set_var("RCON_PASSWORD", "secret");
        env::set_var("ALLOWED_CHATS", "[-1001, 42]");
    }

    fn clear_optional_env() {
        env::remove_var("DATABASE_URL");
        env::remove_var("LOG_FILE");
        env::remove_var("RESTART_GRACE_SECS");
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        set_required_env();
        clear_optional_env();

        let config = BridgeConfig::load(None).unwrap();

        assert_eq!(config.bot_token, "test_token");
        assert_eq!(config.container_name, "factorio");
        assert_eq!(config.rcon_host, "127.0.0.1");
        assert_eq!(config.rcon_port, 27015);
        assert_eq!(config.rcon_password, "secret");
        assert_eq!(config.allowed_chats, vec![-1001, 42]);
        assert_eq!(config.database_url, "db/settings.db");
        assert_eq!(config.log_file, "logs/factorio-bridge.log");
        assert_eq!(config.restart_grace_secs, 10);
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        set_required_env();
        env::set_var("DATABASE_URL", "custom.db");
        env::set_var("LOG_FILE", "custom.log");
        env::set_var("RESTART_GRACE_SECS", "3");

        let config = BridgeConfig::load(None).unwrap();

        assert_eq!(config.database_url, "custom.db");
        assert_eq!(config.log_file, "custom.log");
        assert_eq!(config.restart_grace_secs, 3);

        clear_optional_env();
    }

    #[test]
    #[serial]
    fn test_load_config_with_override_token() {
        set_required_env();
        clear_optional_env();

        let config = BridgeConfig::load(Some("override_token".to_string())).unwrap();

        assert_eq!(config.bot_token, "override_token");
    }

    #[test]
    #[serial]
    fn test_load_config_rejects_bad_allow_list() {
        set_required_env();
        clear_optional_env();
        env::set_var("ALLOWED_CHATS", "not json");

        assert!(BridgeConfig::load(None).is_err());

        env::set_var("ALLOWED_CHATS", "[-1001, 42]");
    }

    #[test]
    #[serial]
    fn test_load_config_rejects_bad_grace_interval() {
        set_required_env();
        clear_optional_env();
        env::set_var("RESTART_GRACE_SECS", "soon");

        assert!(BridgeConfig::load(None).is_err());

        env::remove_var("RESTART_GRACE_SECS");
    }

    #[test]
    #[serial]
    fn test_load_config_missing_container_name() {
        set_required_env();
        clear_optional_env();
        env::remove_var("CONTAINER_NAME");

        assert!(BridgeConfig::load(None).is_err());
    }
}
