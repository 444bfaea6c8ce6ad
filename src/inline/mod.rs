//! Inline parser for Markdown.
//!
//! Works scope by scope. A scope is the whole text of a leaf block or the
//! text between the brackets of one link or image:
//! 1. Scan: one left-to-right pass turning the scope into pieces (text,
//!    code spans, escapes, autolinks, raw HTML, entities, breaks, links and
//!    emphasis delimiter runs).
//! 2. Resolve: pair emphasis delimiters with an opener stack.
//! 3. Emit: walk the pieces, recursing into link text.

mod code_span;
mod emphasis;
pub mod event;
mod links;

pub use event::{InlineEvent, LinkTarget};

use crate::escape::is_markdown_escapable;
use crate::limits::MAX_INLINE_NESTING;
use crate::link_ref::LinkRefStore;
use crate::Range;
use code_span::{backtick_run, find_code_span};
use emphasis::{resolve_emphasis, Delim};
use links::{parse_autolink, parse_entity, parse_html_tag, parse_link, Link};

/// Bytes that may start an inline construct.
const SPECIAL: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0;
    let specials = b"\\`*_![<&\n";
    while i < specials.len() {
        table[specials[i] as usize] = true;
        i += 1;
    }
    table
};

/// One unit of a scanned scope.
#[derive(Debug)]
enum Piece {
    Event(InlineEvent),
    /// Index into the scope's delimiter list.
    Delim(usize),
    Link { link: Link, is_image: bool },
}

/// Inline parser configuration.
#[derive(Debug, Clone, Copy)]
pub struct InlineParser {
    allow_html: bool,
}

impl Default for InlineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed state for one `parse` call.
struct Scanner<'a> {
    text: &'a [u8],
    link_refs: Option<&'a LinkRefStore>,
    allow_html: bool,
}

impl InlineParser {
    /// Create a new inline parser with raw HTML allowed.
    pub fn new() -> Self {
        Self { allow_html: true }
    }

    /// Whether raw inline HTML passes through (otherwise it is escaped).
    pub fn allow_html(mut self, allow: bool) -> Self {
        self.allow_html = allow;
        self
    }

    /// Parse inline content and emit events.
    ///
    /// Reference links resolve against `link_refs`; with `None` they stay
    /// literal text.
    pub fn parse(
        &mut self,
        text: &[u8],
        link_refs: Option<&LinkRefStore>,
        events: &mut Vec<InlineEvent>,
    ) {
        let scanner = Scanner {
            text,
            link_refs,
            allow_html: self.allow_html,
        };
        scanner.scope(0, text.len(), 0, false, events);
    }
}

impl Scanner<'_> {
    /// Scan, resolve and emit the scope `start..end`.
    fn scope(
        &self,
        start: usize,
        end: usize,
        depth: usize,
        in_link: bool,
        events: &mut Vec<InlineEvent>,
    ) {
        let mut delims = Vec::new();
        let pieces = self.scan(start, end, depth, in_link, &mut delims);
        resolve_emphasis(&mut delims);

        for piece in pieces {
            match piece {
                Piece::Event(event) => events.push(event),
                Piece::Delim(idx) => delims[idx].emit(events),
                Piece::Link { link, is_image } => {
                    let content = link.content;
                    if is_image {
                        events.push(InlineEvent::ImageStart(link.target));
                        self.scope(
                            content.start as usize,
                            content.end as usize,
                            depth + 1,
                            in_link,
                            events,
                        );
                        events.push(InlineEvent::ImageEnd);
                    } else {
                        events.push(InlineEvent::LinkStart(link.target));
                        self.scope(
                            content.start as usize,
                            content.end as usize,
                            depth + 1,
                            true,
                            events,
                        );
                        events.push(InlineEvent::LinkEnd);
                    }
                }
            }
        }
    }

    fn scan(
        &self,
        start: usize,
        end: usize,
        depth: usize,
        in_link: bool,
        delims: &mut Vec<Delim>,
    ) -> Vec<Piece> {
        let text = self.text;
        let mut pieces = Vec::new();
        let mut text_start = start;
        let mut pos = start;

        // Close the pending text run at `upto`.
        let flush = |pieces: &mut Vec<Piece>, from: usize, upto: usize| {
            if from < upto {
                pieces.push(Piece::Event(InlineEvent::Text(Range::from_usize(from, upto))));
            }
        };

        while pos < end {
            if !SPECIAL[text[pos] as usize] {
                pos += 1;
                continue;
            }

            match text[pos] {
                b'\\' if pos + 1 < end && is_markdown_escapable(text[pos + 1]) => {
                    flush(&mut pieces, text_start, pos);
                    pieces.push(Piece::Event(InlineEvent::EscapedChar(text[pos + 1])));
                    pos += 2;
                    text_start = pos;
                }
                b'`' => match find_code_span(text, pos, end) {
                    Some(span) => {
                        flush(&mut pieces, text_start, pos);
                        pieces.push(Piece::Event(InlineEvent::Code(Range::from_usize(
                            span.content_start,
                            span.content_end,
                        ))));
                        pos = span.end;
                        text_start = pos;
                    }
                    None => pos += backtick_run(text, pos, end),
                },
                b'*' | b'_' => {
                    let ch = text[pos];
                    let len = text[pos..end].iter().take_while(|&&b| b == ch).count();
                    flush(&mut pieces, text_start, pos);
                    pieces.push(Piece::Delim(delims.len()));
                    delims.push(Delim::new(&text[..end], pos, len));
                    pos += len;
                    text_start = pos;
                }
                b'!' if pos + 1 < end && text[pos + 1] == b'[' && depth < MAX_INLINE_NESTING => {
                    match parse_link(&text[..end], pos + 1, end, self.link_refs) {
                        Some(link) => {
                            flush(&mut pieces, text_start, pos);
                            pos = link.end;
                            pieces.push(Piece::Link {
                                link,
                                is_image: true,
                            });
                            text_start = pos;
                        }
                        None => pos += 1,
                    }
                }
                b'[' if !in_link && depth < MAX_INLINE_NESTING => {
                    match parse_link(&text[..end], pos, end, self.link_refs) {
                        Some(link) => {
                            flush(&mut pieces, text_start, pos);
                            pos = link.end;
                            pieces.push(Piece::Link {
                                link,
                                is_image: false,
                            });
                            text_start = pos;
                        }
                        None => pos += 1,
                    }
                }
                b'<' => {
                    if let Some((url, is_email, next)) = parse_autolink(text, pos, end) {
                        flush(&mut pieces, text_start, pos);
                        pieces.push(Piece::Event(InlineEvent::Autolink { url, is_email }));
                        pos = next;
                        text_start = pos;
                    } else if let Some(next) = self
                        .allow_html
                        .then(|| parse_html_tag(text, pos, end))
                        .flatten()
                    {
                        flush(&mut pieces, text_start, pos);
                        pieces.push(Piece::Event(InlineEvent::Html(Range::from_usize(pos, next))));
                        pos = next;
                        text_start = pos;
                    } else {
                        pos += 1;
                    }
                }
                b'&' => match parse_entity(text, pos, end) {
                    Some(next) => {
                        flush(&mut pieces, text_start, pos);
                        pieces.push(Piece::Event(InlineEvent::Entity(Range::from_usize(pos, next))));
                        pos = next;
                        text_start = pos;
                    }
                    None => pos += 1,
                },
                b'\n' => {
                    let spaces = text[text_start..pos]
                        .iter()
                        .rev()
                        .take_while(|&&b| b == b' ')
                        .count();
                    flush(&mut pieces, text_start, pos - spaces);
                    pieces.push(Piece::Event(if spaces >= 2 {
                        InlineEvent::HardBreak
                    } else {
                        InlineEvent::SoftBreak
                    }));
                    pos += 1;
                    text_start = pos;
                }
                _ => pos += 1,
            }
        }
        flush(&mut pieces, text_start, end);
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_ref::LinkRefDef;

    fn parse(input: &str) -> Vec<InlineEvent> {
        let mut events = Vec::new();
        InlineParser::new().parse(input.as_bytes(), None, &mut events);
        events
    }

    fn parse_with_refs(input: &str, refs: &LinkRefStore) -> Vec<InlineEvent> {
        let mut events = Vec::new();
        InlineParser::new().parse(input.as_bytes(), Some(refs), &mut events);
        events
    }

    /// Concatenated text of all `Text` events.
    fn text_of(input: &str, events: &[InlineEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                InlineEvent::Text(r) => Some(&input[r.start as usize..r.end as usize]),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plain_text() {
        let events = parse("Hello, world!");
        assert_eq!(events, vec![InlineEvent::Text(Range::new(0, 13))]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_escape() {
        let input = r"a \* b";
        let events = parse(input);
        assert!(events.contains(&InlineEvent::EscapedChar(b'*')));
        assert_eq!(text_of(input, &events), "a  b");
    }

    #[test]
    fn test_code_span() {
        let input = "use `*x*` here";
        let events = parse(input);
        assert_eq!(events[1], InlineEvent::Code(Range::new(5, 8)));
        assert!(!events.contains(&InlineEvent::EmphasisStart));
    }

    #[test]
    fn test_emphasis_events() {
        let events = parse("*a* **b**");
        assert_eq!(
            events,
            vec![
                InlineEvent::EmphasisStart,
                InlineEvent::Text(Range::new(1, 2)),
                InlineEvent::EmphasisEnd,
                InlineEvent::Text(Range::new(3, 4)),
                InlineEvent::StrongStart,
                InlineEvent::Text(Range::new(6, 7)),
                InlineEvent::StrongEnd,
            ]
        );
    }

    #[test]
    fn test_inline_link() {
        let input = "see [the *site*](http://x.y) now";
        let events = parse(input);
        assert!(matches!(
            events[1],
            InlineEvent::LinkStart(LinkTarget::Inline { title: None, .. })
        ));
        assert!(events.contains(&InlineEvent::EmphasisStart));
        assert_eq!(events.iter().filter(|e| **e == InlineEvent::LinkEnd).count(), 1);
    }

    #[test]
    fn test_emphasis_does_not_cross_link() {
        let events = parse("*[a*](u)");
        assert!(!events.contains(&InlineEvent::EmphasisStart));
    }

    #[test]
    fn test_no_links_inside_links() {
        let events = parse("[a [b](c) d](e)");
        let starts = events
            .iter()
            .filter(|e| matches!(e, InlineEvent::LinkStart(_)))
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_image() {
        let events = parse("![alt](/img.png \"T\")");
        assert!(matches!(
            events[0],
            InlineEvent::ImageStart(LinkTarget::Inline { title: Some(_), .. })
        ));
        assert_eq!(events.last(), Some(&InlineEvent::ImageEnd));
    }

    #[test]
    fn test_reference_link() {
        let mut refs = LinkRefStore::new();
        refs.insert(
            "foo",
            LinkRefDef {
                url: "/url".to_string(),
                title: None,
            },
        );
        let events = parse_with_refs("[foo] and [bar]", &refs);
        assert_eq!(events[0], InlineEvent::LinkStart(LinkTarget::Reference(0)));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, InlineEvent::LinkStart(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_autolink_and_html() {
        let input = "<http://a.b> <b>x</b>";
        let events = parse(input);
        assert_eq!(
            events[0],
            InlineEvent::Autolink {
                url: Range::new(1, 11),
                is_email: false
            }
        );
        assert!(events.contains(&InlineEvent::Html(Range::new(13, 16))));
    }

    #[test]
    fn test_html_disallowed() {
        let mut events = Vec::new();
        InlineParser::new()
            .allow_html(false)
            .parse(b"<b>x</b>", None, &mut events);
        assert!(!events.iter().any(|e| matches!(e, InlineEvent::Html(_))));
    }

    #[test]
    fn test_entity() {
        let events = parse("AT&amp;T & co");
        assert!(events.contains(&InlineEvent::Entity(Range::new(2, 7))));
    }

    #[test]
    fn test_line_breaks() {
        let input = "one\ntwo  \nthree";
        let events = parse(input);
        assert_eq!(
            events,
            vec![
                InlineEvent::Text(Range::new(0, 3)),
                InlineEvent::SoftBreak,
                InlineEvent::Text(Range::new(4, 7)),
                InlineEvent::HardBreak,
                InlineEvent::Text(Range::new(10, 15)),
            ]
        );
    }

    #[test]
    fn test_image_nesting_limit() {
        let input = format!("{}x{}", "![".repeat(100), "](u)".repeat(100));
        let events = parse(&input);
        let images = events
            .iter()
            .filter(|e| matches!(e, InlineEvent::ImageStart(_)))
            .count();
        assert!(images <= MAX_INLINE_NESTING);
    }
}
