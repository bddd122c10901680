//! Remote console (RCON) client.
//!
//! One scoped connection per message: connect, issue a single colorized chat
//! command, drop the connection. Message volume is low, so there is no pool;
//! under sustained high chat volume this is the throughput ceiling.

use async_trait::async_trait;
use bridge_core::{BridgeError, Result};
use tokio::net::TcpStream;

/// Speaks text into the game chat.
#[async_trait]
pub trait GameConsole: Send + Sync {
    async fn say(&self, text: &str, color: &str) -> Result<()>;
}

/// RCON-backed [`GameConsole`] for a Factorio server.
pub struct RconConsole {
    host: String,
    port: u16,
    password: String,
}

impl RconConsole {
    pub fn new(host: String, port: u16, password: String) -> Self {
        Self {
            host,
            port,
            password,
        }
    }
}

#[async_trait]
impl GameConsole for RconConsole {
    async fn say(&self, text: &str, color: &str) -> Result<()> {
        let address = format!("{}:{}", self.host, self.port);

        let mut connection = rcon::Connection::<TcpStream>::builder()
            .enable_factorio_quirks(true)
            .connect(address.as_str(), &self.password)
            .await
            .map_err(|e| BridgeError::Relay(format!("connect to {address}: {e}")))?;

        connection
            .cmd(&format!("[color={color}]{text}[/color]"))
            .await
            .map_err(|e| BridgeError::Relay(format!("chat command: {e}")))?;

        Ok(())
    }
}
