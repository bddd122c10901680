//! # Factorio ↔ Telegram bridge
//!
//! Bridges a Factorio server's log stream with Telegram in both directions:
//! join/leave/chat events fan out to subscribed chats, and chat messages are
//! relayed into the game over RCON. Wires bridge-core (parser, formatter,
//! sender trait) and storage (settings) with the Docker log stream, the
//! stream supervisor, and the Telegram command dispatch.

pub mod cli;
pub mod config;
pub mod console;
pub mod control;
pub mod lifecycle;
pub mod relay;
pub mod router;
pub mod runner;
pub mod supervisor;
pub mod telegram;

pub use cli::{Cli, Commands};
pub use config::BridgeConfig;
pub use console::{GameConsole, RconConsole};
pub use control::{DockerControl, LogStream, ServerControl};
pub use lifecycle::LifecycleController;
pub use relay::InboundRelay;
pub use router::{route, BroadcastRouter};
pub use runner::run_bridge;
pub use supervisor::{StreamSupervisor, SupervisorStatus};
pub use telegram::{run_repl, Bridge};
