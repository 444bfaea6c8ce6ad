//! Transient read cursor over a single line of text.
//!
//! Lines never carry a scan position of their own; whoever needs to look
//! inside a line (reference extraction, classification, prefix stripping)
//! creates a `LineCursor`, walks it, and drops it.

use crate::escape::is_markdown_escapable;

/// A byte-offset cursor over one line.
///
/// All delimiters the block layer looks for are ASCII, so every offset the
/// cursor stops at is a char boundary of the underlying `&str`.
///
/// # Example
/// ```
/// use linemark::cursor::LineCursor;
///
/// let mut cursor = LineCursor::new("[id]: /url");
/// assert!(cursor.eat(b'['));
/// assert_eq!(cursor.read_until(b"]").as_deref(), Some("id"));
/// assert!(cursor.eat(b']'));
/// assert_eq!(cursor.peek(), Some(b':'));
/// ```
#[derive(Clone, Copy)]
pub struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Create a cursor starting at a byte offset.
    #[inline]
    pub fn new_at(text: &'a str, offset: usize) -> Self {
        debug_assert!(offset <= text.len());
        Self { text, pos: offset }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.text.len() - self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Peek the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Peek at the byte `n` positions ahead.
    #[inline]
    pub fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + n).copied()
    }

    /// Advance by one byte.
    #[inline]
    pub fn bump(&mut self) {
        debug_assert!(!self.is_eof());
        self.pos += 1;
    }

    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Consume `b` if it is the current byte.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.at(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip while predicate holds; returns the number of bytes skipped.
    #[inline]
    pub fn skip_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !predicate(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// Skip spaces; returns the number skipped.
    #[inline]
    pub fn skip_spaces(&mut self) -> usize {
        self.skip_while(|b| b == b' ')
    }

    /// Text from the cursor to the end of the line.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Whether nothing but spaces remains.
    #[inline]
    pub fn rest_is_blank(&self) -> bool {
        self.rest().bytes().all(|b| b == b' ')
    }

    /// Offset of the next occurrence of `needle`, relative to the cursor.
    #[inline]
    pub fn find(&self, needle: u8) -> Option<usize> {
        memchr::memchr(needle, self.rest().as_bytes())
    }

    /// Read up to (not including) the first unescaped byte from `ends`.
    ///
    /// Backslash escapes are resolved in the returned text. A `b'\n'` in
    /// `ends` lets the end of the line terminate the read. On success the
    /// cursor rests on the terminator; on failure it does not move.
    pub fn read_until(&mut self, ends: &[u8]) -> Option<String> {
        let bytes = self.text.as_bytes();
        let mut out = String::new();
        let mut seg_start = self.pos;
        let mut pos = self.pos;

        while pos < bytes.len() {
            let b = bytes[pos];
            if b == b'\\' && pos + 1 < bytes.len() && is_markdown_escapable(bytes[pos + 1]) {
                out.push_str(&self.text[seg_start..pos]);
                seg_start = pos + 1;
                pos += 2;
                continue;
            }
            if ends.contains(&b) {
                break;
            }
            pos += 1;
        }

        let terminated = match bytes.get(pos) {
            Some(b) => ends.contains(b),
            None => ends.contains(&b'\n'),
        };
        if !terminated {
            return None;
        }

        out.push_str(&self.text[seg_start..pos]);
        self.pos = pos;
        Some(out)
    }
}

impl std::fmt::Debug for LineCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineCursor")
            .field("offset", &self.pos)
            .field("remaining", &self.remaining())
            .finish()
    }
}
