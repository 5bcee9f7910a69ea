//! Line splitting and `data:` block accumulation.
//!
//! [`LineBuffer`] turns arbitrary byte chunks into lines, and
//! [`LineDecoder`] turns lines into [`DecodedEvent`]s. Both are plain state
//! machines with no I/O, driven by [`crate::EventDecoder`].

use crate::error::{StreamError, StreamResult};
use sse_client_core::DecodedEvent;
use std::collections::VecDeque;

/// Prefix of the only field this decoder interprets.
pub const DATA_PREFIX: &str = "data:";

/// Longest line accepted before a terminator must appear.
pub const MAX_LINE_LENGTH: usize = 10 * 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Splits byte chunks into lines terminated by `\n`, `\r\n` or `\r`.
///
/// Terminators are stripped. Invalid UTF-8 is replaced rather than rejected.
/// A UTF-8 byte order mark at the very start of the input is dropped.
#[derive(Debug)]
pub struct LineBuffer {
    partial: Vec<u8>,
    skip_lf: bool,
    at_start: bool,
    limit: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_LENGTH)
    }
}

impl LineBuffer {
    /// Create a line buffer with the default line limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line buffer with a custom line limit.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            partial: Vec::new(),
            skip_lf: false,
            at_start: true,
            limit,
        }
    }

    /// Feed a chunk, appending every completed line to `lines`.
    ///
    /// Fails as soon as the current line grows past the limit, whether or
    /// not its terminator is in the same chunk.
    pub fn feed(&mut self, chunk: &[u8], lines: &mut VecDeque<String>) -> StreamResult<()> {
        for &byte in chunk {
            if self.at_start && self.skip_bom_byte(byte) {
                continue;
            }

            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\n' => lines.push_back(self.take_line()),
                b'\r' => {
                    lines.push_back(self.take_line());
                    self.skip_lf = true;
                }
                _ => {
                    if self.partial.len() >= self.limit {
                        return Err(StreamError::LineTooLong { limit: self.limit });
                    }
                    self.partial.push(byte);
                }
            }
        }

        Ok(())
    }

    /// Flush an unterminated final line at end of input.
    pub fn finish(&mut self, lines: &mut VecDeque<String>) {
        self.skip_lf = false;
        self.at_start = false;
        if !self.partial.is_empty() {
            lines.push_back(self.take_line());
        }
    }

    /// Consume `byte` if it continues a leading BOM. A BOM prefix that
    /// breaks off midway stays in the line as ordinary content.
    fn skip_bom_byte(&mut self, byte: u8) -> bool {
        let matched = self.partial.len();
        if matched < UTF8_BOM.len() && byte == UTF8_BOM[matched] {
            self.partial.push(byte);
            if self.partial.len() == UTF8_BOM.len() {
                self.partial.clear();
                self.at_start = false;
            }
            return true;
        }
        self.at_start = false;
        false
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.partial).into_owned();
        self.partial.clear();
        line
    }
}

/// Accumulates `data:` lines and emits an event at each blank line.
///
/// A trailing block with no blank line after it is never emitted; callers
/// that stop feeding lines simply drop it.
#[derive(Debug, Default)]
pub struct LineDecoder {
    data_lines: Vec<String>,
}

impl LineDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one line (without its terminator).
    ///
    /// Returns the completed event when `line` terminates a block.
    pub fn push_line(&mut self, line: &str) -> Option<DecodedEvent> {
        if let Some(value) = line.strip_prefix(DATA_PREFIX) {
            self.data_lines.push(value.trim().to_string());
            return None;
        }

        if line.trim().is_empty() && self.has_pending() {
            let joined = self.data_lines.join("\n");
            self.data_lines.clear();
            let data = joined.trim_end_matches(['\n', '\r']);
            return Some(DecodedEvent::message(data));
        }

        // Other fields (event:, id:, retry:, comments) are not interpreted.
        None
    }

    /// Whether a block is being accumulated.
    pub fn has_pending(&self) -> bool {
        !self.data_lines.is_empty()
    }

    /// Drop the block being accumulated, if any.
    pub fn discard(&mut self) {
        self.data_lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn split(chunks: &[&[u8]]) -> Vec<String> {
        let mut buffer = LineBuffer::new();
        let mut lines = VecDeque::new();
        for chunk in chunks {
            buffer.feed(chunk, &mut lines).unwrap();
        }
        buffer.finish(&mut lines);
        lines.into_iter().collect()
    }

    fn decode_lines(lines: &[&str]) -> Vec<DecodedEvent> {
        let mut decoder = LineDecoder::new();
        lines
            .iter()
            .filter_map(|line| decoder.push_line(line))
            .collect()
    }

    #[rstest]
    #[case(&["a\nb\n"], &["a", "b"])]
    #[case(&["a\r\nb\r\n"], &["a", "b"])]
    #[case(&["a\rb\r"], &["a", "b"])]
    #[case(&["a\r", "\nb\n"], &["a", "b"])]
    #[case(&["da", "ta: x\n\n"], &["data: x", ""])]
    #[case(&["tail without newline"], &["tail without newline"])]
    fn test_line_splitting(#[case] chunks: &[&str], #[case] expected: &[&str]) {
        let chunks: Vec<&[u8]> = chunks.iter().map(|c| c.as_bytes()).collect();
        assert_eq!(split(&chunks), expected);
    }

    #[test]
    fn test_line_split_inside_multibyte_char() {
        let text = "data: héllo\n".as_bytes();
        let (left, right) = text.split_at(8);
        assert_eq!(split(&[left, right]), vec!["data: héllo"]);
    }

    #[test]
    fn test_line_too_long() {
        let mut buffer = LineBuffer::with_limit(4);
        let mut lines = VecDeque::new();
        assert!(buffer.feed(b"abc\n", &mut lines).is_ok());
        let err = buffer.feed(b"abcdef", &mut lines).unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong { limit: 4 }));
    }

    #[test]
    fn test_too_long_line_rejected_even_when_terminated() {
        let mut buffer = LineBuffer::with_limit(4);
        let mut lines = VecDeque::new();
        let err = buffer
            .feed(b"data: way longer than four bytes\n", &mut lines)
            .unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong { limit: 4 }));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let mut buffer = LineBuffer::with_limit(4);
        let mut lines = VecDeque::new();
        buffer.feed(b"abcd\r\nwxyz\n", &mut lines).unwrap();
        assert_eq!(lines, vec!["abcd", "wxyz"]);
    }

    #[rstest]
    #[case(&["\u{feff}data: first\n\ndata: second\n\n"])]
    #[case(&["\u{feff}", "data: first\n\ndata: second\n\n"])]
    fn test_leading_bom_is_dropped(#[case] chunks: &[&str]) {
        let chunks: Vec<&[u8]> = chunks.iter().map(|c| c.as_bytes()).collect();
        let lines = split(&chunks);
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let data: Vec<_> = decode_lines(&lines).into_iter().map(|e| e.data).collect();
        assert_eq!(data, vec!["first", "second"]);
    }

    #[test]
    fn test_bom_split_across_chunks() {
        let bom = "\u{feff}".as_bytes();
        let lines = split(&[&bom[..1], &bom[1..], b"data: x\n"]);
        assert_eq!(lines, vec!["data: x"]);
    }

    #[test]
    fn test_bom_only_stripped_at_start() {
        let lines = split(&["a\n\u{feff}b\n".as_bytes()]);
        assert_eq!(lines, vec!["a", "\u{feff}b"]);
    }

    #[test]
    fn test_single_block() {
        let events = decode_lines(&["data: {\"message\": \"Hello\"}", ""]);
        assert_eq!(events, vec![DecodedEvent::message("{\"message\": \"Hello\"}")]);
        assert_eq!(events[0].event_type, "message");
    }

    #[test]
    fn test_multiline_block_joined_with_newlines() {
        let events = decode_lines(&["data: line1", "data:line2  ", ""]);
        assert_eq!(events[0].data, "line1\nline2");
    }

    #[test]
    fn test_two_blocks_in_order() {
        let events = decode_lines(&[
            "event: customEvent1",
            "data: {\"message\": \"Event 1\"}",
            "",
            "event: customEvent2",
            "data: {\"message\": \"Event 2\"}",
            "",
        ]);
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(
            data,
            vec!["{\"message\": \"Event 1\"}", "{\"message\": \"Event 2\"}"]
        );
    }

    #[rstest]
    #[case(&["", "   ", "\t"])]
    #[case(&["id: 1", "retry: 100", ": comment", ""])]
    #[case(&["DATA: upper", ""])]
    fn test_no_event_without_data_lines(#[case] lines: &[&str]) {
        assert!(decode_lines(lines).is_empty());
    }

    #[test]
    fn test_whitespace_line_terminates_block() {
        let events = decode_lines(&["data: a", "  \t", "data: b", ""]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_empty_data_line_still_emits() {
        let events = decode_lines(&["data:", ""]);
        assert_eq!(events, vec![DecodedEvent::message("")]);

        let events = decode_lines(&["data: a", "data:", ""]);
        assert_eq!(events[0].data, "a");
    }

    #[test]
    fn test_unterminated_block_is_not_flushed() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.push_line("data: pending").is_none());
        assert!(decoder.has_pending());

        decoder.discard();
        assert!(!decoder.has_pending());
        assert!(decoder.push_line("").is_none());
    }
}
