//! XHTML output: the buffer writer and the block tree walker.

use std::borrow::Cow;

use crate::block::{Block, BlockKind};
use crate::escape::{self, unescape_markdown};
use crate::inline::{InlineEvent, InlineParser, LinkTarget};
use crate::line::Line;
use crate::link_ref::LinkRefStore;
use crate::{Options, Range};

/// HTML output writer with pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use linemark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.write_str("<p>");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.write_str("</p>");
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>");
/// ```
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.25x input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: Vec::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write raw bytes without escaping.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Write a static string (compile-time known).
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write text with HTML escaping from a range.
    #[inline]
    pub fn write_escaped_range(&mut self, input: &[u8], range: Range) {
        escape::escape_text_into(&mut self.out, range.slice(input));
    }

    /// Write attribute value with full escaping (including quotes).
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &[u8]) {
        escape::escape_full_into(&mut self.out, attr);
    }

    /// Write link title with entity decoding and HTML escaping.
    #[inline]
    pub fn write_link_title(&mut self, title: &str) {
        escape::escape_link_title_into(&mut self.out, title);
    }

    /// Write autolink URL with percent-encoding and HTML escaping.
    #[inline]
    pub fn write_url_encoded(&mut self, url: &[u8]) {
        escape::escape_autolink_url_into(&mut self.out, url);
    }

    /// Write a link destination for an `href` or `src` attribute.
    #[inline]
    pub fn write_link_url(&mut self, url: &str) {
        escape::escape_link_url_into(&mut self.out, url);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Check if output is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Clear output for reuse (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    /// Get output as str (assumes valid UTF-8).
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: We only write valid UTF-8 (ASCII tags + escaped content
        // sliced at ASCII boundaries of UTF-8 input)
        unsafe { std::str::from_utf8_unchecked(&self.out) }
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: We only write valid UTF-8
        unsafe { String::from_utf8_unchecked(self.out) }
    }

    /// Get mutable reference to internal buffer.
    ///
    /// Use with caution - allows bypassing escaping.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Vec<u8> {
        &mut self.out
    }

    // --- Block elements ---

    #[inline]
    pub fn paragraph_start(&mut self) {
        self.write_str("<p>");
    }

    #[inline]
    pub fn paragraph_end(&mut self) {
        self.write_str("</p>\n");
    }

    /// Write heading start: `<hN>`
    #[inline]
    pub fn heading_start(&mut self, level: u8) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("<h");
        self.out.push(b'0' + level);
        self.out.push(b'>');
    }

    /// Write heading end: `</hN>\n`
    #[inline]
    pub fn heading_end(&mut self, level: u8) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("</h");
        self.out.push(b'0' + level);
        self.write_str(">\n");
    }

    #[inline]
    pub fn code_block_start(&mut self) {
        self.write_str("<pre><code>");
    }

    #[inline]
    pub fn code_block_end(&mut self) {
        self.write_str("</code></pre>\n");
    }

    #[inline]
    pub fn thematic_break(&mut self) {
        self.write_str("<hr />\n");
    }

    #[inline]
    pub fn blockquote_start(&mut self) {
        self.write_str("<blockquote>\n");
    }

    #[inline]
    pub fn blockquote_end(&mut self) {
        self.write_str("</blockquote>\n");
    }

    #[inline]
    pub fn ul_start(&mut self) {
        self.write_str("<ul>\n");
    }

    #[inline]
    pub fn ul_end(&mut self) {
        self.write_str("</ul>\n");
    }

    #[inline]
    pub fn ol_start(&mut self) {
        self.write_str("<ol>\n");
    }

    #[inline]
    pub fn ol_end(&mut self) {
        self.write_str("</ol>\n");
    }

    #[inline]
    pub fn li_start(&mut self) {
        self.write_str("<li>");
    }

    #[inline]
    pub fn li_end(&mut self) {
        self.write_str("</li>\n");
    }

    // --- Inline elements ---

    /// Write inline code: `<code>escaped_content</code>`
    #[inline]
    pub fn inline_code(&mut self, content: &[u8]) {
        self.write_str("<code>");
        self.write_escaped_text(content);
        self.write_str("</code>");
    }

    #[inline]
    pub fn em_start(&mut self) {
        self.write_str("<em>");
    }

    #[inline]
    pub fn em_end(&mut self) {
        self.write_str("</em>");
    }

    #[inline]
    pub fn strong_start(&mut self) {
        self.write_str("<strong>");
    }

    #[inline]
    pub fn strong_end(&mut self) {
        self.write_str("</strong>");
    }

    /// Write link start: `<a href="url" title="title">`
    #[inline]
    pub fn link_start(&mut self, url: &str, title: Option<&str>) {
        self.write_str("<a href=\"");
        self.write_link_url(url);
        if let Some(t) = title {
            self.write_str("\" title=\"");
            self.write_link_title(t);
        }
        self.write_str("\">");
    }

    #[inline]
    pub fn link_end(&mut self) {
        self.write_str("</a>");
    }

    /// Write image: `<img src="url" alt="alt" title="title" />`
    pub fn image(&mut self, url: &str, alt: &[u8], title: Option<&str>) {
        self.write_str("<img src=\"");
        self.write_link_url(url);
        self.write_str("\" alt=\"");
        self.write_escaped_attr(alt);
        if let Some(t) = title {
            self.write_str("\" title=\"");
            self.write_link_title(t);
        }
        self.write_str("\" />");
    }

    /// Write line break: `<br />\n`
    #[inline]
    pub fn line_break(&mut self) {
        self.write_str("<br />\n");
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Write for HtmlWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.out.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Walks a block tree and writes XHTML.
pub struct Renderer<'a> {
    link_refs: Option<&'a LinkRefStore>,
    inline: InlineParser,
    /// Joined text of the leaf being rendered.
    text: Vec<u8>,
    events: Vec<InlineEvent>,
}

impl<'a> Renderer<'a> {
    pub fn new(link_refs: &'a LinkRefStore, options: &Options) -> Self {
        Self {
            link_refs: options.allow_link_refs.then_some(link_refs),
            inline: InlineParser::new().allow_html(options.allow_html),
            text: Vec::with_capacity(256),
            events: Vec::with_capacity(64),
        }
    }

    /// Render `block` (usually the ROOT) into `out`.
    pub fn render(&mut self, block: &Block, out: &mut HtmlWriter) {
        self.block(block, false, out);
    }

    fn children(&mut self, blocks: &[Block], out: &mut HtmlWriter) {
        for (i, child) in blocks.iter().enumerate() {
            self.block(child, i + 1 < blocks.len(), out);
        }
    }

    fn block(&mut self, block: &Block, has_next: bool, out: &mut HtmlWriter) {
        match block.kind {
            BlockKind::Root => self.children(block.children(), out),
            BlockKind::None => {
                self.leaf_text(block.lines(), out);
                if has_next {
                    out.newline();
                }
            }
            BlockKind::Paragraph => {
                out.paragraph_start();
                self.leaf_text(block.lines(), out);
                out.paragraph_end();
            }
            BlockKind::Headline { level } => {
                out.heading_start(level);
                self.leaf_text(block.lines(), out);
                out.heading_end(level);
            }
            BlockKind::Code => {
                out.code_block_start();
                for line in block.lines() {
                    let cut = line.leading().min(4);
                    out.write_escaped_text(&line.text().as_bytes()[cut..]);
                    out.newline();
                }
                out.code_block_end();
            }
            BlockKind::Ruler => out.thematic_break(),
            BlockKind::BlockQuote => {
                out.blockquote_start();
                self.children(block.children(), out);
                out.blockquote_end();
            }
            BlockKind::UnorderedList => {
                out.ul_start();
                self.children(block.children(), out);
                out.ul_end();
            }
            BlockKind::OrderedList => {
                out.ol_start();
                self.children(block.children(), out);
                out.ol_end();
            }
            BlockKind::ListItem => {
                out.li_start();
                if block
                    .children()
                    .first()
                    .is_some_and(|c| c.kind != BlockKind::None)
                {
                    out.newline();
                }
                self.children(block.children(), out);
                out.li_end();
            }
        }
    }

    /// Join a leaf's lines and render its inline content.
    fn leaf_text(&mut self, lines: &[Line], out: &mut HtmlWriter) {
        self.text.clear();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.text.push(b'\n');
            }
            let content = if i + 1 == lines.len() {
                line.content()
            } else {
                line.content_with_trailing()
            };
            self.text.extend_from_slice(content.as_bytes());
        }

        self.events.clear();
        self.inline.parse(&self.text, self.link_refs, &mut self.events);
        self.emit_inline(out);
    }

    fn emit_inline(&self, out: &mut HtmlWriter) {
        let text = &self.text[..];
        let mut i = 0;
        while i < self.events.len() {
            match &self.events[i] {
                InlineEvent::Text(r) => out.write_escaped_range(text, *r),
                InlineEvent::Code(r) => out.inline_code(r.slice(text)),
                InlineEvent::EmphasisStart => out.em_start(),
                InlineEvent::EmphasisEnd => out.em_end(),
                InlineEvent::StrongStart => out.strong_start(),
                InlineEvent::StrongEnd => out.strong_end(),
                InlineEvent::LinkStart(target) => {
                    let (url, title) = self.target(target);
                    out.link_start(&url, title.as_deref());
                }
                InlineEvent::LinkEnd => out.link_end(),
                InlineEvent::ImageStart(target) => {
                    let (alt, next) = self.alt_text(i + 1);
                    let (url, title) = self.target(target);
                    out.image(&url, &alt, title.as_deref());
                    i = next;
                    continue;
                }
                InlineEvent::ImageEnd => {}
                InlineEvent::Autolink { url, is_email } => {
                    out.write_str("<a href=\"");
                    if *is_email {
                        out.write_str("mailto:");
                    }
                    out.write_url_encoded(url.slice(text));
                    out.write_str("\">");
                    out.write_escaped_range(text, *url);
                    out.link_end();
                }
                InlineEvent::Html(r) | InlineEvent::Entity(r) => out.write_bytes(r.slice(text)),
                InlineEvent::SoftBreak => out.newline(),
                InlineEvent::HardBreak => out.line_break(),
                InlineEvent::EscapedChar(b) => out.write_escaped_text(&[*b]),
            }
            i += 1;
        }
    }

    /// URL and title of a link or image, escapes resolved.
    fn target(&self, target: &LinkTarget) -> (Cow<'_, str>, Option<Cow<'_, str>>) {
        match *target {
            LinkTarget::Inline { url, title } => {
                let url = url.try_slice_str(&self.text).unwrap_or_default();
                let title = title.and_then(|t| t.try_slice_str(&self.text).ok());
                (unescape_markdown(url), title.map(unescape_markdown))
            }
            LinkTarget::Reference(idx) => {
                match self.link_refs.and_then(|refs| refs.get(idx)) {
                    Some(def) => (
                        Cow::Borrowed(def.url.as_str()),
                        def.title.as_deref().map(Cow::Borrowed),
                    ),
                    None => (Cow::Borrowed(""), None),
                }
            }
        }
    }

    /// Plain text of an image's alt events starting at `start`; returns the
    /// index after the matching `ImageEnd`.
    fn alt_text(&self, start: usize) -> (Vec<u8>, usize) {
        let text = &self.text[..];
        let mut alt = Vec::new();
        let mut depth = 1usize;
        let mut i = start;
        while i < self.events.len() {
            match &self.events[i] {
                InlineEvent::ImageStart(_) => depth += 1,
                InlineEvent::ImageEnd => {
                    depth -= 1;
                    if depth == 0 {
                        return (alt, i + 1);
                    }
                }
                InlineEvent::Text(r) | InlineEvent::Code(r) => alt.extend_from_slice(r.slice(text)),
                InlineEvent::Autolink { url, .. } => alt.extend_from_slice(url.slice(text)),
                InlineEvent::Entity(r) => {
                    let entity = r.try_slice_str(text).unwrap_or_default();
                    alt.extend_from_slice(html_escape::decode_html_entities(entity).as_bytes());
                }
                InlineEvent::EscapedChar(b) => alt.push(*b),
                InlineEvent::SoftBreak | InlineEvent::HardBreak => alt.push(b' '),
                _ => {}
            }
            i += 1;
        }
        (alt, i)
    }
}
