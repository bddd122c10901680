//! Log line classification: one trimmed line in, one typed [`GameEvent`] out.
//!
//! Classification is an ordered rule table of (tag, kind, extractor). Lines
//! are stateless and independent; anything unrecognized (including partial or
//! binary lines) classifies as [`EventKind::Unknown`] and is dropped by the
//! router. The log stream is untrusted and lossy, so parsing never fails.

/// What a log line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Join,
    Leave,
    Chat,
    Unknown,
}

/// A classified log line. Transient: produced per line, routed, discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub kind: EventKind,
    /// The original line, untouched.
    pub raw: String,
    /// Event-specific extracted text: the after-tag remainder for Join/Leave,
    /// the whole line for Chat (formatting is deferred to the router), empty
    /// for Unknown.
    pub payload: String,
}

/// One formatted message bound for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel_id: i64,
    pub body: String,
    /// Chat-class messages are suppressed for channels that have broadcasts
    /// disabled; Join/Leave are always delivered.
    pub is_chat: bool,
}

const JOIN_TAG: &str = "[JOIN]";
const LEAVE_TAG: &str = "[LEAVE]";
const CHAT_TAG: &str = "[CHAT]";

/// Chat lines spoken by the server itself are not relayed.
const SERVER_SENDER: &str = "<server>";

#[derive(Debug, Clone, Copy)]
enum Extract {
    /// Payload is the text following the tag, trimmed.
    AfterTag,
    /// Payload is the whole line.
    WholeLine,
}

/// Rules are tried in order; the first matching tag wins.
const RULES: [(&str, EventKind, Extract); 3] = [
    (JOIN_TAG, EventKind::Join, Extract::AfterTag),
    (LEAVE_TAG, EventKind::Leave, Extract::AfterTag),
    (CHAT_TAG, EventKind::Chat, Extract::WholeLine),
];

/// Classifies a single log line.
pub fn parse(line: &str) -> GameEvent {
    for (tag, kind, extract) in RULES {
        if !line.contains(tag) {
            continue;
        }
        if kind == EventKind::Chat && line.contains(SERVER_SENDER) {
            continue;
        }
        let payload = match extract {
            Extract::AfterTag => line
                .split_once(tag)
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or_default(),
            Extract::WholeLine => line.to_string(),
        };
        return GameEvent {
            kind,
            raw: line.to_string(),
            payload,
        };
    }

    GameEvent {
        kind: EventKind::Unknown,
        raw: line.to_string(),
        payload: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_line_extracts_trimmed_payload() {
        let event = parse("2026-08-30 12:00:00 [JOIN] Alice joined the game");
        assert_eq!(event.kind, EventKind::Join);
        assert_eq!(event.payload, "Alice joined the game");
    }

    #[test]
    fn join_payload_trims_surrounding_whitespace() {
        let event = parse("[JOIN]    Alice joined the game   ");
        assert_eq!(event.payload, "Alice joined the game");
    }

    #[test]
    fn leave_line_extracts_payload() {
        let event = parse("[LEAVE] Bob left the game");
        assert_eq!(event.kind, EventKind::Leave);
        assert_eq!(event.payload, "Bob left the game");
    }

    #[test]
    fn chat_line_keeps_whole_line_as_payload() {
        let line = "2026-08-30 12:00:00 [CHAT] Bob: hello";
        let event = parse(line);
        assert_eq!(event.kind, EventKind::Chat);
        assert_eq!(event.payload, line);
    }

    #[test]
    fn server_chat_is_unknown() {
        let event = parse("[CHAT] <server>: autosave complete");
        assert_eq!(event.kind, EventKind::Unknown);
        assert_eq!(event.payload, "");
    }

    #[test]
    fn join_wins_over_chat_when_both_tags_present() {
        let event = parse("[JOIN] troll [CHAT] joined");
        assert_eq!(event.kind, EventKind::Join);
    }

    #[test]
    fn unrecognized_line_is_unknown_with_empty_payload() {
        let event = parse("1200.5 Info ServerMultiplayerManager.cpp:800");
        assert_eq!(event.kind, EventKind::Unknown);
        assert_eq!(event.payload, "");
    }

    #[test]
    fn garbage_bytes_are_tolerated() {
        let event = parse("\u{fffd}\u{fffd}\u{0000}partial");
        assert_eq!(event.kind, EventKind::Unknown);
    }

    #[test]
    fn empty_line_is_unknown() {
        assert_eq!(parse("").kind, EventKind::Unknown);
    }
}
