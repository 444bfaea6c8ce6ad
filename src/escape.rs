//! HTML escaping utilities.
//!
//! Scans for the first escapable byte with memchr, then bulk-copies the
//! segments between escapes.

use std::borrow::Cow;

use memchr::{memchr, memchr2, memchr3};

/// Bytes a backslash may escape in Markdown source.
#[inline]
pub fn is_markdown_escapable(b: u8) -> bool {
    matches!(
        b,
        b'\\' | b'[' | b']' | b'(' | b')' | b'{' | b'}' | b'#' | b'"' | b'\''
            | b'.' | b'>' | b'*' | b'+' | b'-' | b'_' | b'!' | b'`'
    )
}

/// Resolve backslash escapes; other backslashes are kept.
pub fn unescape_markdown(input: &str) -> Cow<'_, str> {
    if memchr(b'\\', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii() && is_markdown_escapable(next as u8) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Text content escape table (`"` included for attribute-safe output).
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

const ATTR_ESCAPE_TABLE: [bool; 256] = {
    let mut table = TEXT_ESCAPE_TABLE;
    table[b'\'' as usize] = true;
    table
};

#[inline]
fn entity_for(b: u8) -> &'static [u8] {
    match b {
        b'<' => b"&lt;",
        b'>' => b"&gt;",
        b'&' => b"&amp;",
        b'"' => b"&quot;",
        _ => b"&#39;",
    }
}

/// Escape HTML text content into output buffer.
///
/// # Example
/// ```
/// use linemark::escape::escape_text_into;
///
/// let mut out = Vec::new();
/// escape_text_into(&mut out, b"<script>");
/// assert_eq!(out, b"&lt;script&gt;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut Vec<u8>, input: &[u8]) {
    let first = min_opt(memchr3(b'<', b'>', b'&', input), memchr(b'"', input));
    escape_from(out, input, first, &TEXT_ESCAPE_TABLE);
}

/// Escape an HTML attribute value (also escapes `'`).
#[inline]
pub fn escape_full_into(out: &mut Vec<u8>, input: &[u8]) {
    let first = min_opt(
        memchr3(b'<', b'>', b'&', input),
        memchr2(b'"', b'\'', input),
    );
    escape_from(out, input, first, &ATTR_ESCAPE_TABLE);
}

fn escape_from(out: &mut Vec<u8>, input: &[u8], first: Option<usize>, table: &[bool; 256]) {
    let Some(mut pos) = first else {
        out.extend_from_slice(input);
        return;
    };
    out.extend_from_slice(&input[..pos]);

    while pos < input.len() {
        let start = pos;
        while pos < input.len() && !table[input[pos] as usize] {
            pos += 1;
        }
        out.extend_from_slice(&input[start..pos]);
        if pos < input.len() {
            out.extend_from_slice(entity_for(input[pos]));
            pos += 1;
        }
    }
}

#[inline]
fn min_opt(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn push_percent(out: &mut Vec<u8>, b: u8) {
    out.push(b'%');
    out.push(HEX[(b >> 4) as usize]);
    out.push(HEX[(b & 0xF) as usize]);
}

/// Write a link or image destination as an `href`/`src` value.
///
/// Entities are decoded first, then spaces, quotes, control bytes and
/// non-ASCII bytes are percent-encoded and the rest is attribute-escaped.
pub fn escape_link_url_into(out: &mut Vec<u8>, url: &str) {
    let decoded = html_escape::decode_html_entities(url);
    for &b in decoded.as_bytes() {
        match b {
            b' ' => out.extend_from_slice(b"%20"),
            b'"' => out.extend_from_slice(b"%22"),
            b'\\' => out.extend_from_slice(b"%5C"),
            b'<' | b'>' | b'&' | b'\'' => out.extend_from_slice(entity_for(b)),
            0x00..=0x1F | 0x7F..=0xFF => push_percent(out, b),
            _ => out.push(b),
        }
    }
}

/// Write a link title as an attribute value, decoding entities first.
pub fn escape_link_title_into(out: &mut Vec<u8>, title: &str) {
    let decoded = html_escape::decode_html_entities(title);
    escape_full_into(out, decoded.as_bytes());
}

/// Write an autolink target: percent-encode what cannot appear raw in a
/// URL, then HTML-escape.
pub fn escape_autolink_url_into(out: &mut Vec<u8>, url: &[u8]) {
    for &b in url {
        match b {
            b'\\' => out.extend_from_slice(b"%5C"),
            b'[' => out.extend_from_slice(b"%5B"),
            b']' => out.extend_from_slice(b"%5D"),
            b'`' => out.extend_from_slice(b"%60"),
            b' ' => out.extend_from_slice(b"%20"),
            b'<' | b'>' | b'&' | b'"' | b'\'' => out.extend_from_slice(entity_for(b)),
            0x00..=0x1F | 0x80..=0xFF => push_percent(out, b),
            _ => out.push(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(input: &str) -> String {
        let mut out = Vec::new();
        escape_text_into(&mut out, input.as_bytes());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escape_text_passthrough() {
        assert_eq!(text("Hello, World!"), "Hello, World!");
        assert_eq!(text(""), "");
        assert_eq!(text("Grüße"), "Grüße");
    }

    #[test]
    fn test_escape_text_mixed() {
        assert_eq!(
            text("<a href=\"test\">link & stuff</a>"),
            "&lt;a href=&quot;test&quot;&gt;link &amp; stuff&lt;/a&gt;"
        );
        assert_eq!(text("it's"), "it's");
    }

    #[test]
    fn test_escape_at_boundaries() {
        assert_eq!(text("<"), "&lt;");
        assert_eq!(text("hello<"), "hello&lt;");
        assert_eq!(text("<<<"), "&lt;&lt;&lt;");
    }

    #[test]
    fn test_escape_full() {
        let mut out = Vec::new();
        escape_full_into(&mut out, b"<>&\"'");
        assert_eq!(out, b"&lt;&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_link_url() {
        let mut out = Vec::new();
        escape_link_url_into(&mut out, "/a b?x=1&amp;y=\"ü\"");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "/a%20b?x=1&amp;y=%22%C3%BC%22"
        );
    }

    #[test]
    fn test_link_title() {
        let mut out = Vec::new();
        escape_link_title_into(&mut out, "Tom &amp; \"Jerry\"");
        assert_eq!(out, b"Tom &amp; &quot;Jerry&quot;");
    }

    #[test]
    fn test_autolink_url() {
        let mut out = Vec::new();
        escape_autolink_url_into(&mut out, b"http://x.y/[a]&b");
        assert_eq!(out, b"http://x.y/%5Ba%5D&amp;b");
    }

    #[test]
    fn test_unescape() {
        assert!(matches!(unescape_markdown("plain"), Cow::Borrowed("plain")));
        assert_eq!(unescape_markdown(r"a\]b\*c"), "a]b*c");
        assert_eq!(unescape_markdown(r"C:\path\\x"), r"C:\path\x");
        assert_eq!(unescape_markdown("end\\"), "end\\");
    }

    #[test]
    fn test_markdown_escapable() {
        for b in br#"\[](){}#"'.>*+-_!`"# {
            assert!(is_markdown_escapable(*b), "{}", *b as char);
        }
        assert!(!is_markdown_escapable(b'a'));
        assert!(!is_markdown_escapable(b'<'));
        assert!(!is_markdown_escapable(b' '));
    }
}
