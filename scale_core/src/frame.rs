//! Stream framing: byte chunks in, reversed-digit tokens out.
//!
//! The scale streams each reading with its characters in reverse order and
//! terminates it with `=`. Chunks arrive at arbitrary boundaries, so text is
//! accumulated until a delimiter shows up.

/// Frame terminator sent after every reading.
pub const DELIMITER: char = '=';

/// Readings meaning "nothing on the display yet".
pub const SENTINELS: [&str; 2] = ["None", "-"];

/// Undo the device's transmission order: trim, then reverse the characters.
///
/// `"05"` on the wire is the reading `"50"`; `" 00.5\r\n"` is `"5.00"`.
pub fn decode_reversed_digits(raw: &str) -> String {
    raw.trim().chars().rev().collect()
}

/// A completed frame after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Candidate reading to compare against the held one.
    Reading(String),
    /// `"None"` or `"-"`; ignored by the stability check.
    Sentinel(String),
}

impl Token {
    /// Only the exact sentinels are set aside; an empty frame is a reading
    /// like any other and resets a differing candidate.
    pub fn classify(text: String) -> Self {
        if SENTINELS.contains(&text.as_str()) {
            Token::Sentinel(text)
        } else {
            Token::Reading(text)
        }
    }
}

/// Text accumulator owned by one session.
///
/// Holds at most one trailing fragment: everything after the last delimiter
/// seen so far.
#[derive(Debug, Default, Clone)]
pub struct FrameBuffer {
    text: String,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk, replacing malformed UTF-8 with U+FFFD.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.text.push_str(&String::from_utf8_lossy(bytes));
    }

    /// Take the first completed frame, if any.
    ///
    /// The buffer keeps only what follows the last delimiter, so frames
    /// between the first and the last delimiter are dropped.
    pub fn next_token(&mut self) -> Option<Token> {
        let first = self.text.find(DELIMITER)?;
        let last = self.text.rfind(DELIMITER).unwrap_or(first);
        let token = decode_reversed_digits(&self.text[..first]);
        if last > first {
            let dropped = self.text[first + 1..last].matches(DELIMITER).count() + 1;
            tracing::trace!(dropped, "frames skipped within one chunk");
        }
        self.text.drain(..last + DELIMITER.len_utf8());
        Some(Token::classify(token))
    }

    /// Append a chunk and take the first completed frame.
    pub fn fold(&mut self, bytes: &[u8]) -> Option<Token> {
        self.push_bytes(bytes);
        self.next_token()
    }

    /// Unterminated trailing text.
    pub fn pending(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
