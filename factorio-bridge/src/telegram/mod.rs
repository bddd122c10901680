//! Telegram dispatch glue: command parsing, command execution, and the REPL
//! runner. Thin adapter over the bridge core; all commands are restricted to
//! the configured chat allow-list, and everything else from an allowed chat
//! is forwarded into the game.

pub mod commands;
pub mod handlers;
pub mod runner;

pub use commands::{Command, CommandParse};
pub use handlers::{handle_update, Bridge, InboundUpdate};
pub use runner::run_repl;
