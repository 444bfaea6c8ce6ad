//! Emphasis and strong emphasis resolution.
//!
//! Delimiter runs of `*` and `_` are collected per inline scope (the whole
//! leaf, or the text of one link) and matched with an opener stack. Matching
//! never crosses a scope, so emphasis cannot straddle a link boundary.

use smallvec::SmallVec;

use super::event::InlineEvent;
use crate::Range;

/// A run of `*` or `_`.
#[derive(Debug, Clone)]
pub struct Delim {
    pub ch: u8,
    pub pos: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// Characters not yet used by a match.
    remaining: usize,
    /// Match sizes taken from the left end (as closer), innermost first.
    closes: SmallVec<[u8; 2]>,
    /// Match sizes taken from the right end (as opener), innermost first.
    opens: SmallVec<[u8; 2]>,
}

impl Delim {
    /// Classify the run of `len` bytes at `pos` by its neighbours.
    pub fn new(text: &[u8], pos: usize, len: usize) -> Self {
        let ch = text[pos];
        let before = pos.checked_sub(1).map(|i| text[i]);
        let after = text.get(pos + len).copied();

        let before_space = before.is_none_or(is_space);
        let after_space = after.is_none_or(is_space);
        let before_punct = before.is_some_and(|b| b.is_ascii_punctuation());
        let after_punct = after.is_some_and(|b| b.is_ascii_punctuation());

        let left_flanking = !after_space && (!after_punct || before_space || before_punct);
        let right_flanking = !before_space && (!before_punct || after_space || after_punct);

        let (can_open, can_close) = if ch == b'_' {
            (
                left_flanking && (!right_flanking || before_punct),
                right_flanking && (!left_flanking || after_punct),
            )
        } else {
            (left_flanking, right_flanking)
        };

        Self {
            ch,
            pos,
            can_open,
            can_close,
            remaining: len,
            closes: SmallVec::new(),
            opens: SmallVec::new(),
        }
    }

    /// Events for this run, left to right: closing tags, leftover literal
    /// characters, opening tags.
    pub fn emit(&self, events: &mut Vec<InlineEvent>) {
        let mut used_left = 0;
        for &n in &self.closes {
            events.push(if n == 2 {
                InlineEvent::StrongEnd
            } else {
                InlineEvent::EmphasisEnd
            });
            used_left += n as usize;
        }
        if self.remaining > 0 {
            let start = self.pos + used_left;
            events.push(InlineEvent::Text(Range::from_usize(
                start,
                start + self.remaining,
            )));
        }
        for &n in self.opens.iter().rev() {
            events.push(if n == 2 {
                InlineEvent::StrongStart
            } else {
                InlineEvent::EmphasisStart
            });
        }
    }
}

#[inline]
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace()
}

/// Match openers with closers, recording the result on each run.
pub fn resolve_emphasis(delims: &mut [Delim]) {
    let mut openers: Vec<usize> = Vec::new();

    for i in 0..delims.len() {
        if delims[i].can_close {
            while delims[i].remaining > 0 {
                let ch = delims[i].ch;
                let Some(slot) = openers.iter().rposition(|&j| delims[j].ch == ch) else {
                    break;
                };
                let j = openers[slot];
                let n = if delims[j].remaining >= 2 && delims[i].remaining >= 2 {
                    2
                } else {
                    1
                };

                delims[j].remaining -= n;
                delims[j].opens.push(n as u8);
                delims[i].remaining -= n;
                delims[i].closes.push(n as u8);

                // Openers between the pair can no longer match.
                openers.truncate(slot + 1);
                if delims[j].remaining == 0 {
                    openers.pop();
                }
            }
        }
        if delims[i].can_open && delims[i].remaining > 0 {
            openers.push(i);
        }
    }
}
