//! Slash-command parsing.
//!
//! Unknown slash commands are not treated as commands: like any other text
//! they fall through to the forward path.

/// A recognized bridge command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Subscribe this chat (broadcasts start disabled).
    Start,
    /// Unsubscribe this chat.
    Stop,
    EnableMessages,
    DisableMessages,
    SetUser { name: String, color: String },
    RestartServer,
}

/// Outcome of trying to read a command from a message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParse {
    Recognized(Command),
    /// A known command with bad arguments; reply with usage.
    Malformed { usage: &'static str },
    /// Not a command at all.
    None,
}

/// Parses a message text. Handles the `/command@botname` form Telegram sends
/// in group chats.
pub fn parse(text: &str) -> CommandParse {
    let mut tokens = text.split_whitespace();
    let Some(first) = tokens.next() else {
        return CommandParse::None;
    };
    if !first.starts_with('/') {
        return CommandParse::None;
    }
    let name = first.split('@').next().unwrap_or(first);

    match name {
        "/start" => CommandParse::Recognized(Command::Start),
        "/stop" => CommandParse::Recognized(Command::Stop),
        "/enable_messages" => CommandParse::Recognized(Command::EnableMessages),
        "/disable_messages" => CommandParse::Recognized(Command::DisableMessages),
        "/restart_server" => CommandParse::Recognized(Command::RestartServer),
        "/set_user" => match (tokens.next(), tokens.next()) {
            (Some(name), Some(color)) => CommandParse::Recognized(Command::SetUser {
                name: name.to_string(),
                color: color.to_string(),
            }),
            _ => CommandParse::Malformed {
                usage: "Usage: /set_user <name> <color>",
            },
        },
        _ => CommandParse::None,
    }
}
