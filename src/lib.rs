//! linemark: line-oriented Markdown to XHTML converter
//!
//! A document is read as a sequence of lines. Every line is tabs-expanded,
//! measured and classified, link reference definitions are pulled out into a
//! table, and the remaining lines are split recursively into a block tree.
//! Inline markup is parsed per leaf block while rendering.
//!
//! # Pipeline
//! - [`tokenizer`]: characters to [`Line`]s plus the [`LinkRefStore`]
//! - [`classify`]: the syntactic kind of one line in context
//! - [`block`]: recursive decomposition into a [`Block`] tree
//! - [`inline`] and [`render`]: inline events and XHTML output

pub mod block;
pub mod classify;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod line;
pub mod link_ref;
pub mod range;
pub mod render;
pub mod source;
pub mod tokenizer;

use std::io::Read;
use std::path::Path;

// Re-export primary types
pub use block::{Block, BlockKind, BlockParser};
pub use error::{Error, Result};
pub use inline::{InlineEvent, InlineParser};
pub use line::Line;
pub use link_ref::{LinkRefDef, LinkRefStore};
pub use range::Range;
pub use render::{HtmlWriter, Renderer};

/// Parsing/rendering options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Pass raw inline HTML through; when off it is escaped as text.
    pub allow_html: bool,
    /// Resolve reference-style links against the definition table.
    pub allow_link_refs: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_html: true,
            allow_link_refs: true,
        }
    }
}

/// A parsed document: the block tree and its link definitions.
#[derive(Debug, Clone)]
pub struct Document {
    /// ROOT block holding the top-level sequence.
    pub root: Block,
    pub link_refs: LinkRefStore,
}

impl Document {
    /// Render into `writer` with the given options.
    pub fn render(&self, options: &Options, writer: &mut HtmlWriter) {
        Renderer::new(&self.link_refs, options).render(&self.root, writer);
    }

    /// Render to a new string.
    pub fn to_html(&self, options: &Options) -> String {
        let mut writer = HtmlWriter::new();
        self.render(options, &mut writer);
        writer.into_string()
    }
}

/// Parse a document into its block tree without rendering.
///
/// # Example
/// ```
/// use linemark::BlockKind;
///
/// let doc = linemark::parse("Title\n=====\n\n[home]: /index.html\n");
/// let first = &doc.root.children()[0];
/// assert_eq!(first.kind, BlockKind::Headline { level: 1 });
/// assert_eq!(doc.link_refs.len(), 1);
/// ```
pub fn parse(input: &str) -> Document {
    let tokenized = tokenizer::tokenize(input);
    let root = BlockParser::new().parse(tokenized.lines);
    Document {
        root,
        link_refs: tokenized.link_refs,
    }
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = linemark::to_html("# Hello\n\nWorld");
/// assert_eq!(html, "<h1>Hello</h1>\n<p>World</p>\n");
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    let mut writer = HtmlWriter::with_capacity_for(input.len());
    parse(input).render(options, &mut writer);
    writer.into_string()
}

/// Convert Markdown to HTML, writing into a provided buffer.
///
/// The buffer is cleared first; its capacity is reused.
pub fn to_html_into(input: &str, out: &mut Vec<u8>) {
    to_html_into_with_options(input, out, &Options::default());
}

/// Convert Markdown to HTML into a provided buffer with options.
pub fn to_html_into_with_options(input: &str, out: &mut Vec<u8>, options: &Options) {
    out.clear();
    out.reserve(input.len() + input.len() / 4);
    let mut writer = HtmlWriter::new();
    // Use the provided buffer directly
    std::mem::swap(writer.buffer_mut(), out);
    parse(input).render(options, &mut writer);
    std::mem::swap(writer.buffer_mut(), out);
}

/// Read a UTF-8 file and convert it.
pub fn file_to_html(path: impl AsRef<Path>) -> Result<String> {
    file_to_html_with_encoding(path, source::DEFAULT_ENCODING)
}

/// Read a file in the encoding named by `label` and convert it.
pub fn file_to_html_with_encoding(path: impl AsRef<Path>, label: &str) -> Result<String> {
    let text = source::read_file(path.as_ref(), label)?;
    Ok(to_html(&text))
}

/// Read a UTF-8 stream to its end and convert it.
pub fn reader_to_html<R: Read>(reader: R) -> Result<String> {
    reader_to_html_with_encoding(reader, source::DEFAULT_ENCODING)
}

/// Read a stream in the encoding named by `label` and convert it.
pub fn reader_to_html_with_encoding<R: Read>(reader: R, label: &str) -> Result<String> {
    let text = source::read_to_string(reader, label)?;
    Ok(to_html(&text))
}
