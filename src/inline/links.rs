//! Link, autolink, raw HTML and entity recognition.
//!
//! Every function here looks at one candidate position and either returns
//! the extent of the construct or `None`, leaving the bytes to be treated as
//! text.

use memchr::memchr;

use super::code_span::{backtick_run, find_code_span};
use super::event::LinkTarget;
use crate::escape::{is_markdown_escapable, unescape_markdown};
use crate::link_ref::LinkRefStore;
use crate::Range;

/// A recognized `[text](...)` or `[text][id]` construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub target: LinkTarget,
    /// Link text (or image alt text) between the brackets.
    pub content: Range,
    /// Position just past the construct.
    pub end: usize,
}

/// Index of the `]` matching the `[` just before `from`.
///
/// Escaped brackets and brackets inside code spans do not count.
pub fn find_bracket_close(text: &[u8], from: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = from;
    while i < end {
        match text[i] {
            b'\\' if i + 1 < end && is_markdown_escapable(text[i + 1]) => {
                i += 2;
                continue;
            }
            b'`' => {
                if let Some(span) = find_code_span(text, i, end) {
                    i = span.end;
                } else {
                    i += backtick_run(text, i, end);
                }
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Recognize a link whose `[` is at `open`.
pub fn parse_link(
    text: &[u8],
    open: usize,
    end: usize,
    link_refs: Option<&LinkRefStore>,
) -> Option<Link> {
    let close = find_bracket_close(text, open + 1, end)?;
    let content = Range::from_usize(open + 1, close);
    let after = close + 1;

    if text.get(after) == Some(&b'(') && after < end {
        if let Some((url, title, next)) = parse_inline_destination(text, after + 1, end) {
            return Some(Link {
                target: LinkTarget::Inline { url, title },
                content,
                end: next,
            });
        }
    }

    let refs = link_refs?;

    // `[text][id]` and `[text][]`, one optional space between.
    let mut id_open = after;
    while id_open < end && id_open < after + 1 && text[id_open] == b' ' {
        id_open += 1;
    }
    if id_open < end && text[id_open] == b'[' {
        if let Some(id_close) = find_bracket_close(text, id_open + 1, end) {
            let id = if id_close == id_open + 1 {
                content
            } else {
                Range::from_usize(id_open + 1, id_close)
            };
            if let Some(idx) = lookup(text, id, refs) {
                return Some(Link {
                    target: LinkTarget::Reference(idx),
                    content,
                    end: id_close + 1,
                });
            }
            if id_open == after {
                return None;
            }
        }
    }

    // Shortcut `[id]`.
    let idx = lookup(text, content, refs)?;
    Some(Link {
        target: LinkTarget::Reference(idx),
        content,
        end: after,
    })
}

fn lookup(text: &[u8], id: Range, refs: &LinkRefStore) -> Option<usize> {
    let id = id.try_slice_str(text).ok()?;
    if id.trim().is_empty() {
        return None;
    }
    refs.get_index(&unescape_markdown(id).replace('\n', " "))
}

/// Parse `url "title")` starting just past the `(`.
fn parse_inline_destination(
    text: &[u8],
    start: usize,
    end: usize,
) -> Option<(Range, Option<Range>, usize)> {
    let mut i = skip_whitespace(text, start, end);

    let url = if text.get(i) == Some(&b'<') && i < end {
        let gt = i + 1 + memchr(b'>', &text[i + 1..end])?;
        if text[i + 1..gt].contains(&b'\n') {
            return None;
        }
        let url = Range::from_usize(i + 1, gt);
        i = gt + 1;
        url
    } else {
        let url_start = i;
        let mut parens = 0usize;
        while i < end {
            match text[i] {
                b'\\' if i + 1 < end => {
                    i += 2;
                    continue;
                }
                b' ' | b'\n' => break,
                b'(' => parens += 1,
                b')' => {
                    if parens == 0 {
                        break;
                    }
                    parens -= 1;
                }
                _ => {}
            }
            i += 1;
        }
        Range::from_usize(url_start, i.min(end))
    };

    i = skip_whitespace(text, i, end);
    if i >= end {
        return None;
    }
    if text[i] == b')' {
        return Some((url, None, i + 1));
    }

    // Title: the closing delimiter is the last one followed by `)`.
    let close = match text[i] {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let title_start = i + 1;
    let mut j = title_start;
    while j < end {
        if text[j] == b'\\' && j + 1 < end {
            j += 2;
            continue;
        }
        if text[j] == close {
            let k = skip_whitespace(text, j + 1, end);
            if k < end && text[k] == b')' {
                return Some((url, Some(Range::from_usize(title_start, j)), k + 1));
            }
        }
        j += 1;
    }
    None
}

#[inline]
fn skip_whitespace(text: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && (text[i] == b' ' || text[i] == b'\n') {
        i += 1;
    }
    i
}

/// Recognize `<scheme:...>` or `<user@host>` at `pos`.
///
/// Returns the address range, whether it is an email address, and the
/// position just past the `>`.
pub fn parse_autolink(text: &[u8], pos: usize, end: usize) -> Option<(Range, bool, usize)> {
    let gt = pos + 1 + memchr(b'>', &text[pos + 1..end])?;
    let inner = &text[pos + 1..gt];
    if inner.is_empty() || inner.iter().any(|&b| b == b' ' || b == b'<' || b == b'\n') {
        return None;
    }
    let url = Range::from_usize(pos + 1, gt);
    if is_uri(inner) {
        Some((url, false, gt + 1))
    } else if is_email(inner) {
        Some((url, true, gt + 1))
    } else {
        None
    }
}

fn is_uri(s: &[u8]) -> bool {
    let Some(colon) = memchr(b':', s) else {
        return false;
    };
    let scheme = &s[..colon];
    (2..=32).contains(&scheme.len())
        && scheme[0].is_ascii_alphabetic()
        && scheme
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'.' | b'-'))
}

fn is_email(s: &[u8]) -> bool {
    let Some(at) = memchr(b'@', s) else {
        return false;
    };
    let (local, domain) = (&s[..at], &s[at + 1..]);
    !local.is_empty()
        && !domain.is_empty()
        && local.iter().all(|&b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+/=?^_`{|}~.-".contains(&b)
        })
        && domain
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
        && domain[0] != b'.'
        && domain[domain.len() - 1] != b'.'
}

/// Recognize a raw HTML tag or comment at `pos`; returns the end position.
pub fn parse_html_tag(text: &[u8], pos: usize, end: usize) -> Option<usize> {
    let rest = &text[pos..end];
    if rest.starts_with(b"<!--") {
        let body = &rest[4..];
        return body
            .windows(3)
            .position(|w| w == b"-->")
            .map(|off| pos + 4 + off + 3);
    }

    let mut i = pos + 1;
    if i < end && text[i] == b'/' {
        i += 1;
    }
    if i >= end || !text[i].is_ascii_alphabetic() {
        return None;
    }
    while i < end && (text[i].is_ascii_alphanumeric() || text[i] == b'-') {
        i += 1;
    }
    if i >= end || !matches!(text[i], b' ' | b'\n' | b'/' | b'>') {
        return None;
    }

    let mut quote: Option<u8> = None;
    while i < end {
        let b = text[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'<' => return None,
                b'>' => return Some(i + 1),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Recognize `&name;`, `&#123;` or `&#x1F;` at `pos`; returns the end.
pub fn parse_entity(text: &[u8], pos: usize, end: usize) -> Option<usize> {
    #[derive(Clone, Copy)]
    enum Form {
        Named,
        Decimal,
        Hex,
    }

    let mut i = pos + 1;
    let form = if text.get(i) == Some(&b'#') {
        i += 1;
        if matches!(text.get(i), Some(b'x' | b'X')) {
            i += 1;
            Form::Hex
        } else {
            Form::Decimal
        }
    } else if text.get(i).is_some_and(u8::is_ascii_alphabetic) {
        Form::Named
    } else {
        return None;
    };

    let start = i;
    while i < end {
        let ok = match form {
            Form::Named => text[i].is_ascii_alphanumeric(),
            Form::Decimal => text[i].is_ascii_digit(),
            Form::Hex => text[i].is_ascii_hexdigit(),
        };
        if !ok {
            break;
        }
        i += 1;
    }
    let (min, max) = match form {
        Form::Named => (2, 32),
        Form::Decimal => (1, 7),
        Form::Hex => (1, 6),
    };
    let len = i - start;
    (i < end && text[i] == b';' && (min..=max).contains(&len)).then_some(i + 1)
}
