//! Line tokenizer and link reference extraction.
//!
//! Reads characters one at a time, expands tabs to 4-column stops, splits on
//! LF, CR, CRLF (and LFCR), and pulls link reference definitions out of the
//! line stream before anything downstream sees them:
//!
//! ```text
//! [id]: http://example.com/  "Optional Title"
//! [id]: <http://example.com/>
//!       'Title on the next line'
//! ```

use std::iter::Peekable;

use crate::cursor::LineCursor;
use crate::line::{link_neighbours, Line};
use crate::link_ref::{LinkRefDef, LinkRefStore};

/// Tab stop width in columns.
pub const TAB_WIDTH: usize = 4;

/// Output of tokenization: the visible lines plus the harvested references.
#[derive(Debug, Default)]
pub struct Tokenized {
    pub lines: Vec<Line>,
    pub link_refs: LinkRefStore,
}

/// Tokenize an in-memory document.
pub fn tokenize(input: &str) -> Tokenized {
    Tokenizer::new(input.chars()).run()
}

/// Streaming line tokenizer over any character source.
pub struct Tokenizer<I: Iterator<Item = char>> {
    chars: Peekable<I>,
}

/// A definition recognized on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Definition {
    id: String,
    url: String,
    title: Option<String>,
}

impl<I: Iterator<Item = char>> Tokenizer<I> {
    pub fn new(chars: I) -> Self {
        Self {
            chars: chars.peekable(),
        }
    }

    /// Consume the whole source.
    pub fn run(mut self) -> Tokenized {
        let mut lines = Vec::new();
        let mut link_refs = LinkRefStore::new();
        // Definition still waiting for a title on the following line.
        let mut pending: Option<usize> = None;

        while let Some(text) = self.next_line() {
            let line = Line::new(text);

            if let Some(def) = parse_definition(&line) {
                let has_title = def.title.is_some();
                let idx = link_refs.insert(
                    &def.id,
                    LinkRefDef {
                        url: def.url,
                        title: def.title,
                    },
                );
                pending = (!has_title).then_some(idx);
                continue;
            }

            if let Some(idx) = pending.take() {
                if let Some(title) = parse_title_line(&line) {
                    link_refs.set_title(idx, title);
                    continue;
                }
            }

            lines.push(line);
        }

        link_neighbours(&mut lines);
        log::debug!(
            "tokenized {} lines, {} link references",
            lines.len(),
            link_refs.len()
        );
        Tokenized { lines, link_refs }
    }

    /// Read one raw line with tabs expanded; `None` once the source is dry.
    fn next_line(&mut self) -> Option<String> {
        self.chars.peek()?;

        let mut text = String::with_capacity(80);
        let mut column = 0usize;
        while let Some(c) = self.chars.next() {
            match c {
                '\n' => {
                    self.chars.next_if_eq(&'\r');
                    break;
                }
                '\r' => {
                    self.chars.next_if_eq(&'\n');
                    break;
                }
                '\t' => {
                    let stop = column + (TAB_WIDTH - column % TAB_WIDTH);
                    while column < stop {
                        text.push(' ');
                        column += 1;
                    }
                }
                _ => {
                    text.push(c);
                    column += 1;
                }
            }
        }
        Some(text)
    }
}

/// Recognize `[id]: url "title"` (title optional).
fn parse_definition(line: &Line) -> Option<Definition> {
    if line.is_blank() || line.leading() >= 4 {
        return None;
    }

    let mut cursor = LineCursor::new_at(line.text(), line.leading());
    if !cursor.eat(b'[') {
        return None;
    }
    let id = cursor.read_until(b"]")?;
    cursor.bump();
    if !cursor.eat(b':') {
        return None;
    }
    cursor.skip_spaces();

    let url = if cursor.eat(b'<') {
        let url = cursor.read_until(b">")?;
        cursor.bump();
        url
    } else {
        cursor.read_until(b" \n")?
    };
    if url.is_empty() {
        return None;
    }

    cursor.skip_spaces();
    if cursor.is_eof() {
        return Some(Definition {
            id,
            url,
            title: None,
        });
    }

    let title = read_title(&mut cursor)?;
    if !cursor.rest_is_blank() {
        return None;
    }
    Some(Definition {
        id,
        url,
        title: Some(title),
    })
}

/// A line holding nothing but a delimited title.
fn parse_title_line(line: &Line) -> Option<String> {
    if line.is_blank() {
        return None;
    }
    let mut cursor = LineCursor::new_at(line.text(), line.leading());
    let title = read_title(&mut cursor)?;
    cursor.rest_is_blank().then_some(title)
}

/// Read `"title"`, `'title'` or `(title)` at the cursor.
fn read_title(cursor: &mut LineCursor<'_>) -> Option<String> {
    let close = match cursor.peek()? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    cursor.bump();
    let title = cursor.read_until(&[close])?;
    cursor.bump();
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input)
            .lines
            .iter()
            .map(|l| l.text().to_string())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let out = tokenize("");
        assert!(out.lines.is_empty());
        assert!(out.link_refs.is_empty());
    }

    #[test]
    fn test_line_terminators() {
        assert_eq!(texts("a\nb\rc\r\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(texts("a\n\rb"), vec!["a", "b"]);
        assert_eq!(texts("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(texts("\n"), vec![""]);
    }

    #[test]
    fn test_tab_expansion() {
        assert_eq!(texts("a\tb"), vec!["a   b"]);
        assert_eq!(texts("\tx"), vec!["    x"]);
        assert_eq!(texts("abcd\te"), vec!["abcd    e"]);
        assert_eq!(texts("ab\t\tc"), vec!["ab      c"]);
    }

    #[test]
    fn test_tab_expansion_counts_chars_not_bytes() {
        assert_eq!(texts("é\tb"), vec!["é   b"]);
    }

    #[test]
    fn test_blank_flags() {
        let out = tokenize("a\n\nb\nc");
        assert!(out.lines[2].prev_empty());
        assert!(!out.lines[3].prev_empty());
        assert!(out.lines[0].next_empty());
    }

    #[test]
    fn test_definition_with_title() {
        let out = tokenize("[foo]: /url \"title\"\n\n[foo]\n");
        let def = out.link_refs.lookup("foo").unwrap();
        assert_eq!(def.url, "/url");
        assert_eq!(def.title.as_deref(), Some("title"));
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[1].text(), "[foo]");
    }

    #[test]
    fn test_definition_title_delimiters() {
        let out = tokenize("[a]: /a 'single'\n[b]: /b (parens)\n");
        assert_eq!(out.link_refs.lookup("a").unwrap().title.as_deref(), Some("single"));
        assert_eq!(out.link_refs.lookup("b").unwrap().title.as_deref(), Some("parens"));
        assert!(out.lines.is_empty());
    }

    #[test]
    fn test_definition_angle_url() {
        let out = tokenize("[x]: <http://a.b/c d>\n");
        assert_eq!(out.link_refs.lookup("x").unwrap().url, "http://a.b/c d");
    }

    #[test]
    fn test_title_on_next_line() {
        let out = tokenize("[foo]: /url\n\"title\"\n");
        let def = out.link_refs.lookup("foo").unwrap();
        assert_eq!(def.title.as_deref(), Some("title"));
        assert!(out.lines.is_empty());
    }

    #[test]
    fn test_indented_title_on_next_line() {
        let out = tokenize("[foo]: /url\n    (title)\nrest");
        assert_eq!(out.link_refs.lookup("foo").unwrap().title.as_deref(), Some("title"));
        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.lines[0].text(), "rest");
    }

    #[test]
    fn test_pending_title_not_taken_across_blank_line() {
        let out = tokenize("[foo]: /url\n\n\"title\"\n");
        assert_eq!(out.link_refs.lookup("foo").unwrap().title, None);
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[1].text(), "\"title\"");
    }

    #[test]
    fn test_next_line_not_a_title() {
        let out = tokenize("[foo]: /url\nplain text\n");
        assert_eq!(out.link_refs.lookup("foo").unwrap().title, None);
        assert_eq!(out.lines.len(), 1);
    }

    #[test]
    fn test_title_after_titled_definition_is_text() {
        let out = tokenize("[foo]: /url 'one'\n'two'\n");
        assert_eq!(out.link_refs.lookup("foo").unwrap().title.as_deref(), Some("one"));
        assert_eq!(out.lines.len(), 1);
    }

    #[test]
    fn test_malformed_definitions_stay_visible() {
        for input in [
            "[foo] /url",
            "[foo]:",
            "[foo]: <unterminated",
            "[foo]: /url \"unterminated",
            "[foo]: /url trailing",
            "[foo]: /url 'title' junk",
            "    [foo]: /url",
            "[foo",
        ] {
            let out = tokenize(input);
            assert!(out.link_refs.is_empty(), "accepted {input:?}");
            assert_eq!(out.lines.len(), 1, "dropped {input:?}");
        }
    }

    #[test]
    fn test_definition_with_indent() {
        let out = tokenize("   [foo]: /url");
        assert!(out.link_refs.lookup("foo").is_some());
        assert!(out.lines.is_empty());
    }

    #[test]
    fn test_escaped_bracket_in_id() {
        let out = tokenize(r"[a\]b]: /url");
        assert!(out.link_refs.lookup("a]b").is_some());
    }

    #[test]
    fn test_flags_skip_removed_definitions() {
        let out = tokenize("a\n[x]: /y\nb");
        assert_eq!(out.lines.len(), 2);
        assert!(!out.lines[1].prev_empty());
    }
}
