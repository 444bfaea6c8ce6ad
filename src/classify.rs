//! Line classification.
//!
//! A pure function of a line and the line after it. The engine calls it on
//! whatever line sits at the front of the current run, so the same text may
//! classify differently after a container prefix has been stripped.

use crate::cursor::LineCursor;
use crate::line::Line;

/// Syntactic role of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    /// Indented four or more columns.
    Code,
    /// `***`, `- - -`, `___`.
    Ruler,
    /// ATX headline, `#` through `######`.
    Headline { level: u8 },
    /// Text line followed by a `===` or `---` underline.
    Setext { level: u8 },
    Quote,
    /// `1. item`; `marker_end` is the byte offset of the item text.
    OrderedList { marker_end: usize },
    /// `* item`, `- item`, `+ item`.
    UnorderedList { marker_end: usize },
    Other,
}

impl LineKind {
    #[inline]
    pub fn is_list(self) -> bool {
        matches!(
            self,
            LineKind::OrderedList { .. } | LineKind::UnorderedList { .. }
        )
    }

    /// Byte offset just past a list marker and its following space.
    #[inline]
    pub fn marker_end(self) -> Option<usize> {
        match self {
            LineKind::OrderedList { marker_end } | LineKind::UnorderedList { marker_end } => {
                Some(marker_end)
            }
            _ => None,
        }
    }

    /// Whether a line of this kind interrupts a running paragraph.
    #[inline]
    pub fn starts_block(self, list_mode: bool) -> bool {
        match self {
            LineKind::Headline { .. } | LineKind::Setext { .. } | LineKind::Ruler | LineKind::Quote => {
                true
            }
            LineKind::OrderedList { .. } | LineKind::UnorderedList { .. } => list_mode,
            _ => false,
        }
    }
}

/// Classify `line`, looking at `next` only for setext underlines.
pub fn classify(line: &Line, next: Option<&Line>) -> LineKind {
    if line.is_blank() {
        return LineKind::Empty;
    }
    if line.leading() >= 4 {
        return LineKind::Code;
    }
    if is_ruler(line) {
        return LineKind::Ruler;
    }
    if let Some(level) = atx_level(line) {
        return LineKind::Headline { level };
    }

    let text = line.text().as_bytes();
    let first = text[line.leading()];
    if first == b'>' {
        return LineKind::Quote;
    }
    if let Some(marker_end) = ordered_marker_end(line) {
        return LineKind::OrderedList { marker_end };
    }
    if matches!(first, b'*' | b'-' | b'+') && text.get(line.leading() + 1) == Some(&b' ') {
        return LineKind::UnorderedList {
            marker_end: line.leading() + 2,
        };
    }
    if let Some(level) = next.and_then(underline_level) {
        return LineKind::Setext { level };
    }
    LineKind::Other
}

/// Three or more of one of `*`, `-`, `_`, optionally separated by spaces.
fn is_ruler(line: &Line) -> bool {
    let content = line.content().as_bytes();
    let marker = content[0];
    if !matches!(marker, b'*' | b'-' | b'_') {
        return false;
    }
    let mut count = 0;
    for &b in content {
        if b == marker {
            count += 1;
        } else if b != b' ' {
            return false;
        }
    }
    count >= 3
}

fn atx_level(line: &Line) -> Option<u8> {
    let mut cursor = LineCursor::new_at(line.text(), line.leading());
    let hashes = cursor.skip_while(|b| b == b'#');
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match cursor.peek() {
        None | Some(b' ') => Some(hashes as u8),
        _ => None,
    }
}

fn ordered_marker_end(line: &Line) -> Option<usize> {
    let mut cursor = LineCursor::new_at(line.text(), line.leading());
    if cursor.skip_while(|b| b.is_ascii_digit()) == 0 {
        return None;
    }
    if !cursor.eat(b'.') || !cursor.at(b' ') {
        return None;
    }
    Some(cursor.offset() + 1)
}

/// `=` underline is level 1, `-` underline is level 2.
fn underline_level(line: &Line) -> Option<u8> {
    if line.is_blank() || line.leading() >= 4 {
        return None;
    }
    let content = line.content().as_bytes();
    let level = match content[0] {
        b'=' => 1,
        b'-' => 2,
        _ => return None,
    };
    content
        .iter()
        .all(|&b| b == content[0])
        .then_some(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> LineKind {
        classify(&Line::new(text), None)
    }

    fn kind_before(text: &str, next: &str) -> LineKind {
        classify(&Line::new(text), Some(&Line::new(next)))
    }

    #[test]
    fn test_empty_and_code() {
        assert_eq!(kind(""), LineKind::Empty);
        assert_eq!(kind("    "), LineKind::Empty);
        assert_eq!(kind("    let x = 1;"), LineKind::Code);
        assert_eq!(kind("    # not a headline"), LineKind::Code);
        assert_eq!(kind("    ***"), LineKind::Code);
    }

    #[test]
    fn test_ruler() {
        assert_eq!(kind("***"), LineKind::Ruler);
        assert_eq!(kind("- - -"), LineKind::Ruler);
        assert_eq!(kind(" ___  "), LineKind::Ruler);
        assert_eq!(kind("--"), LineKind::Other);
        assert_eq!(kind("*-*"), LineKind::Other);
    }

    #[test]
    fn test_atx_headline() {
        assert_eq!(kind("# Title"), LineKind::Headline { level: 1 });
        assert_eq!(kind("###### Six"), LineKind::Headline { level: 6 });
        assert_eq!(kind("##"), LineKind::Headline { level: 2 });
        assert_eq!(kind("####### Seven"), LineKind::Other);
        assert_eq!(kind("#hashtag"), LineKind::Other);
    }

    #[test]
    fn test_quote() {
        assert_eq!(kind("> quoted"), LineKind::Quote);
        assert_eq!(kind("  >quoted"), LineKind::Quote);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(kind("- item"), LineKind::UnorderedList { marker_end: 2 });
        assert_eq!(kind("  + item"), LineKind::UnorderedList { marker_end: 4 });
        assert_eq!(kind("* item"), LineKind::UnorderedList { marker_end: 2 });
        assert_eq!(kind("12. item"), LineKind::OrderedList { marker_end: 4 });
        assert_eq!(kind(" 1. item"), LineKind::OrderedList { marker_end: 4 });
        assert_eq!(kind("-item"), LineKind::Other);
        assert_eq!(kind("1.item"), LineKind::Other);
        assert_eq!(kind("1) item"), LineKind::Other);
    }

    #[test]
    fn test_setext() {
        assert_eq!(kind_before("Title", "====="), LineKind::Setext { level: 1 });
        assert_eq!(kind_before("Title", "---  "), LineKind::Setext { level: 2 });
        assert_eq!(kind_before("Title", "-"), LineKind::Setext { level: 2 });
        assert_eq!(kind_before("Title", "=-="), LineKind::Other);
        assert_eq!(kind_before("Title", "    ==="), LineKind::Other);
        assert_eq!(kind_before("Title", ""), LineKind::Other);
    }

    #[test]
    fn test_setext_only_for_plain_lines() {
        assert_eq!(kind_before("- item", "---"), LineKind::UnorderedList { marker_end: 2 });
        assert_eq!(kind_before("> quote", "==="), LineKind::Quote);
        assert_eq!(kind_before("# Head", "==="), LineKind::Headline { level: 1 });
    }

    #[test]
    fn test_starts_block() {
        assert!(LineKind::Ruler.starts_block(false));
        assert!(!LineKind::UnorderedList { marker_end: 2 }.starts_block(false));
        assert!(LineKind::UnorderedList { marker_end: 2 }.starts_block(true));
        assert!(!LineKind::Code.starts_block(true));
    }
}
