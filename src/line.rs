//! Source lines.

/// One logical input line after tab expansion, terminator stripped.
///
/// `prev_empty` and `next_empty` record whether the neighbouring lines were
/// blank in document order. They survive splitting, so a line
/// at the top of a nested block still knows it followed a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    leading: usize,
    trailing: usize,
    is_empty: bool,
    pub(crate) prev_empty: bool,
    pub(crate) next_empty: bool,
}

impl Line {
    /// Create a line from already tab-expanded text.
    pub fn new(text: impl Into<String>) -> Self {
        let mut line = Self {
            text: text.into(),
            leading: 0,
            trailing: 0,
            is_empty: true,
            prev_empty: false,
            next_empty: false,
        };
        line.measure();
        line
    }

    fn measure(&mut self) {
        let bytes = self.text.as_bytes();
        self.leading = bytes.iter().take_while(|&&b| b == b' ').count();
        self.is_empty = self.leading == bytes.len();
        self.trailing = if self.is_empty {
            0
        } else {
            bytes.iter().rev().take_while(|&&b| b == b' ').count()
        };
    }

    /// Full line text, including indentation.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of leading space columns.
    #[inline]
    pub fn leading(&self) -> usize {
        self.leading
    }

    /// Number of trailing space columns.
    #[inline]
    pub fn trailing(&self) -> usize {
        self.trailing
    }

    /// Whether the line holds nothing but spaces.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.is_empty
    }

    /// Whether the preceding line (in document order) was blank.
    #[inline]
    pub fn prev_empty(&self) -> bool {
        self.prev_empty
    }

    /// Whether the following line (in document order) was blank.
    #[inline]
    pub fn next_empty(&self) -> bool {
        self.next_empty
    }

    /// Text with leading and trailing spaces removed.
    #[inline]
    pub fn content(&self) -> &str {
        &self.text[self.leading..self.text.len() - self.trailing]
    }

    /// Text with leading spaces removed, trailing spaces kept.
    #[inline]
    pub fn content_with_trailing(&self) -> &str {
        &self.text[self.leading..]
    }

    /// Drop the first `n` bytes (a marker or indentation prefix).
    pub(crate) fn strip_prefix(&mut self, n: usize) {
        let n = n.min(self.text.len());
        self.text.drain(..n);
        self.measure();
    }

    /// Replace the text, keeping the blank-neighbour flags.
    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
        self.measure();
    }
}

/// Recompute the blank-neighbour flags of a freshly tokenized sequence.
pub(crate) fn link_neighbours(lines: &mut [Line]) {
    for i in 1..lines.len() {
        let prev_blank = lines[i - 1].is_empty;
        let this_blank = lines[i].is_empty;
        lines[i].prev_empty = prev_blank;
        lines[i - 1].next_empty = this_blank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_indent() {
        let line = Line::new("    code  ");
        assert_eq!(line.leading(), 4);
        assert_eq!(line.trailing(), 2);
        assert!(!line.is_blank());
        assert_eq!(line.content(), "code");
        assert_eq!(line.content_with_trailing(), "code  ");
    }

    #[test]
    fn test_blank_line() {
        let line = Line::new("   ");
        assert!(line.is_blank());
        assert_eq!(line.leading(), 3);
        assert_eq!(line.trailing(), 0);
        assert_eq!(line.content(), "");
        assert!(Line::new("").is_blank());
    }

    #[test]
    fn test_strip_prefix_remeasures() {
        let mut line = Line::new(">   quoted");
        line.strip_prefix(2);
        assert_eq!(line.text(), "  quoted");
        assert_eq!(line.leading(), 2);
    }

    #[test]
    fn test_strip_prefix_past_end() {
        let mut line = Line::new("- ");
        line.strip_prefix(10);
        assert!(line.is_blank());
    }

    #[test]
    fn test_link_neighbours() {
        let mut lines = vec![Line::new("a"), Line::new(""), Line::new("b"), Line::new("c")];
        link_neighbours(&mut lines);
        assert!(!lines[0].prev_empty());
        assert!(lines[0].next_empty());
        assert!(lines[2].prev_empty());
        assert!(!lines[2].next_empty());
        assert!(!lines[3].prev_empty());
    }
}
