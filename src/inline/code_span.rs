//! Code span detection.
//!
//! Backtick runs must match exactly. Code spans bind tighter than every
//! other inline construct, so the link scanner skips over them too.

use crate::limits::MAX_CODE_SPAN_BACKTICKS;

/// A matched code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpan {
    /// Start of the content, surrounding spaces trimmed.
    pub content_start: usize,
    /// End of the content, surrounding spaces trimmed.
    pub content_end: usize,
    /// Position just past the closing backticks.
    pub end: usize,
}

/// Length of the backtick run at `pos`.
#[inline]
pub fn backtick_run(text: &[u8], pos: usize, end: usize) -> usize {
    text[pos..end].iter().take_while(|&&b| b == b'`').count()
}

/// Match the backtick run at `pos` against the next run of equal length.
pub fn find_code_span(text: &[u8], pos: usize, end: usize) -> Option<CodeSpan> {
    let open = backtick_run(text, pos, end);
    if open == 0 || open > MAX_CODE_SPAN_BACKTICKS {
        return None;
    }

    let mut i = pos + open;
    while i < end {
        match memchr::memchr(b'`', &text[i..end]) {
            Some(off) => i += off,
            None => return None,
        }
        let run = backtick_run(text, i, end);
        if run == open {
            let mut content_start = pos + open;
            let mut content_end = i;
            while content_start < content_end && is_space(text[content_start]) {
                content_start += 1;
            }
            while content_end > content_start && is_space(text[content_end - 1]) {
                content_end -= 1;
            }
            return Some(CodeSpan {
                content_start,
                content_end,
                end: i + run,
            });
        }
        i += run;
    }
    None
}

#[inline]
fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\n'
}
