//! Parsing of inbound chat protocol lines.
//!
//! Only two kinds of lines matter to the wheel: keepalive probes, which must be
//! answered, and channel messages, which may carry the join command. Everything
//! else is [`ChatLine::Other`] and is dropped.

/// Payload used in the keepalive reply when the probe carries none.
pub const DEFAULT_PING_PAYLOAD: &str = "tmi.twitch.tv";

/// Chat command that enters the sender into the wheel.
pub const JOIN_COMMAND: &str = "!join";

const PING_TOKEN: &str = "PING";
const MESSAGE_TOKEN: &str = "PRIVMSG";

/// A classified inbound line, borrowing from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatLine<'a> {
    /// Keepalive probe; the reply must echo `payload`.
    Ping { payload: &'a str },
    /// Channel message from `sender`.
    Message { sender: &'a str, text: &'a str },
    /// Anything else, including malformed messages.
    Other,
}

/// Classify one line (without its terminator).
pub fn parse_line(line: &str) -> ChatLine<'_> {
    if line.starts_with(PING_TOKEN) {
        let payload = line
            .find(':')
            .map(|colon| &line[colon + 1..])
            .unwrap_or(DEFAULT_PING_PAYLOAD);
        return ChatLine::Ping { payload };
    }

    let Some(marker) = line.find(MESSAGE_TOKEN) else {
        return ChatLine::Other;
    };

    let Some(sender) = parse_sender(line) else {
        return ChatLine::Other;
    };

    // Text follows "PRIVMSG <channel> :"
    let Some(text_start) = line[marker..].find(" :") else {
        return ChatLine::Other;
    };
    let text = &line[marker + text_start + 2..];

    ChatLine::Message { sender, text }
}

/// Extract the sender nick from a `:nick!user@host` prefix.
///
/// A leading IRCv3 tag block (`@key=value;... `) is skipped first.
pub fn parse_sender(line: &str) -> Option<&str> {
    let rest = if line.starts_with('@') {
        let space = line.find(' ')?;
        &line[space + 1..]
    } else {
        line
    };

    let prefix = rest.strip_prefix(':')?;
    let bang = prefix.find('!')?;
    let sender = &prefix[..bang];

    (!sender.is_empty()).then_some(sender)
}

/// Check whether message text starts with the join command.
///
/// The match is case-insensitive and has no word-boundary check, so `"!joined"` also matches.
pub fn is_join_command(text: &str) -> bool {
    text.to_lowercase().starts_with(JOIN_COMMAND)
}

/// Keepalive acknowledgement for a probe payload.
pub fn pong_reply(payload: &str) -> String {
    format!("PONG :{}", payload)
}
