//! Pure text transforms between game log lines and Telegram messages.
//!
//! Outbound: `[CHAT] name: text` → `<b>name</b>: text` with bracketed game
//! codes replaced by glyphs. Inbound: resolved display name + message body +
//! attachment kind → the string spoken into the game chat.

use std::sync::OnceLock;

use regex::Regex;

/// Color used for users without a stored profile.
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Bracketed game codes that render as rich icons in-game; replaced with a
/// visual stand-in before the text reaches Telegram.
const CODE_GLYPHS: [(&str, &str); 7] = [
    ("[entity=tile-ghost]", "👻"),
    ("[entity=entity-ghost]", "👻"),
    ("[entity=behemoth-biter]", "🪲"),
    ("[virtual-signal=signal-skull]", "💀"),
    ("[virtual-signal=signal-ghost]", "👻"),
    ("[virtual-signal=signal-check]", "✅"),
    ("[virtual-signal=signal-deny]", "❌"),
];

fn chat_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[CHAT\] (.*?): (.*)").expect("chat pattern is valid")
    })
}

/// Formats a raw `[CHAT]` log line for Telegram: bold username, glyph
/// substitution in the message body. Lines that do not match the pattern
/// pass through unchanged.
pub fn format_chat_line(line: &str) -> String {
    let Some(caps) = chat_pattern().captures(line) else {
        return line.to_string();
    };
    let name = &caps[1];
    let mut message = caps[2].to_string();
    for (code, glyph) in CODE_GLYPHS {
        if message.contains(code) {
            message = message.replace(code, glyph);
        }
    }
    format!("<b>{name}</b>: {message}")
}

/// Non-text content carried by an inbound Telegram message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    File,
    Sticker,
    Voice,
    Audio,
    Contact,
    Location,
    Poll,
    None,
}

impl AttachmentKind {
    /// Bracketed tag shown in the game chat, or `None` for plain text.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            AttachmentKind::Image => Some("[IMAGE]"),
            AttachmentKind::Video => Some("[VIDEO]"),
            AttachmentKind::File => Some("[FILE]"),
            AttachmentKind::Sticker => Some("[STICKER]"),
            AttachmentKind::Voice => Some("[VOICE]"),
            AttachmentKind::Audio => Some("[AUDIO]"),
            AttachmentKind::Contact => Some("[CONTACT]"),
            AttachmentKind::Location => Some("[LOCATION]"),
            AttachmentKind::Poll => Some("[POLL]"),
            AttachmentKind::None => None,
        }
    }
}

/// Builds the game-chat string for a forwarded Telegram message:
/// `name: [TAG] text`, tag omitted for plain text, tag alone when the
/// message has no text body (e.g. a bare sticker).
pub fn format_inbound(name: &str, text: Option<&str>, attachment: AttachmentKind) -> String {
    match (text, attachment.tag()) {
        (Some(text), Some(tag)) => format!("{name}: {tag} {text}"),
        (Some(text), None) => format!("{name}: {text}"),
        (None, Some(tag)) => format!("{name}: {tag}"),
        (None, None) => format!("{name}:"),
    }
}
