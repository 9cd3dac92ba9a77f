//! Splitting the inbound byte stream into protocol lines.

/// Two-byte terminator ending every protocol line.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Most bytes kept while waiting for a terminator.
///
/// Covers a 512-byte protocol line plus an 8191-byte tag block with room to spare.
pub const MAX_PENDING_BYTES: usize = 16 * 1024;

/// Accumulates raw reads and yields complete lines.
///
/// Reads may end anywhere, including inside a multi-byte character or between `\r` and
/// `\n`. Bytes stay buffered until their terminator arrives. Lines are decoded lossily.
/// A line that grows past [`MAX_PENDING_BYTES`] is dropped up to its terminator.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
    /// Bytes before this offset are known not to start a terminator
    scanned: usize,
    /// Dropping the rest of an overlong line
    discarding: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete line, without its terminator.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            let Some(end) = self.find_terminator() else {
                self.hold_partial();
                return None;
            };

            let discarded = std::mem::take(&mut self.discarding);
            let line =
                (!discarded).then(|| String::from_utf8_lossy(&self.buffer[..end]).into_owned());
            self.buffer.drain(..end + LINE_TERMINATOR.len());
            self.scanned = 0;

            if line.is_some() {
                return line;
            }
        }
    }

    /// Bytes buffered without a terminator yet.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn find_terminator(&self) -> Option<usize> {
        self.buffer[self.scanned..]
            .windows(LINE_TERMINATOR.len())
            .position(|window| window == LINE_TERMINATOR)
            .map(|offset| self.scanned + offset)
    }

    fn hold_partial(&mut self) {
        // The last byte may be the first half of a terminator
        self.scanned = self
            .buffer
            .len()
            .saturating_sub(LINE_TERMINATOR.len() - 1);

        if self.buffer.len() <= MAX_PENDING_BYTES {
            return;
        }

        tracing::debug!(
            "Discarding {} bytes without a line terminator",
            self.buffer.len()
        );
        let keep_cr = self.buffer.last() == Some(&LINE_TERMINATOR[0]);
        self.buffer.clear();
        if keep_cr {
            self.buffer.push(LINE_TERMINATOR[0]);
        }
        self.scanned = 0;
        self.discarding = true;
    }
}
