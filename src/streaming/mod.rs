//! Line splitting for streamed gateway responses
//!
//! Streamed bodies arrive as byte chunks that do not respect line
//! boundaries. [`LineBuffer`] reassembles them into lines.

/// Accumulates chunk bytes and yields complete lines.
///
/// Lines end at `\n`; a trailing `\r` is stripped. Empty lines are
/// yielded too, since callers that only want the first line must see
/// exactly what the server sent first.
///
/// # Example
/// ```
/// use medassist::streaming::LineBuffer;
///
/// let mut buffer = LineBuffer::new();
/// assert!(buffer.feed(b"data: {\"scene\":").is_empty());
/// assert_eq!(buffer.feed(b"0}\r\n"), vec!["data: {\"scene\":0}"]);
/// ```
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Feed a chunk and return the lines it completed.
    ///
    /// Bytes are buffered until a newline arrives, so multi-byte UTF-8
    /// sequences split across chunks decode correctly. Invalid UTF-8 is
    /// replaced with U+FFFD.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        lines
    }

    /// Whether an unterminated line is buffered
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Flush the unterminated final line, if any
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.pending);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}
