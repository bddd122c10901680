//! # bridge-core
//!
//! Core types and traits for the Factorio ↔ Telegram bridge: the log event
//! parser, outbound/inbound text formatting, the [`ChannelSender`] trait,
//! error taxonomy, and tracing initialization. Transport details live in the
//! application crate; everything here is testable without a running server.

pub mod error;
pub mod events;
pub mod format;
pub mod logger;
pub mod sender;

pub use error::{BridgeError, ControlError, Result};
pub use events::{parse, EventKind, GameEvent, OutboundMessage};
pub use format::{format_chat_line, format_inbound, AttachmentKind, DEFAULT_COLOR};
pub use logger::init_tracing;
pub use sender::{ChannelSender, MarkupMode, TelegramSender};
