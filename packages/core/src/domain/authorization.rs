//! Stream allow-list check.

/// Lowercase hosts or channels the wheel is allowed to run for.
pub const ALLOWED_STREAMS: &[&str] = &["cbf01", "shoepert"];

/// Check the host nick and room against [`ALLOWED_STREAMS`].
pub fn is_allowed(nick: &str, room: &str) -> bool {
    is_allowed_in(ALLOWED_STREAMS, nick, room)
}

/// Check the host nick and room against an explicit allow-list.
///
/// Both inputs are lower-cased and a leading `#` is stripped from `room`.
/// Returns `true` if either normalized value equals an entry of `allowed`.
pub fn is_allowed_in(allowed: &[&str], nick: &str, room: &str) -> bool {
    let nick = nick.to_lowercase();
    let room = room.strip_prefix('#').unwrap_or(room).to_lowercase();

    allowed.iter().any(|entry| nick == *entry || room == *entry)
}
