//! Inline-level event types.

use crate::Range;

/// Where a link or image points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// `[text](url "title")`: ranges into the inline text.
    Inline { url: Range, title: Option<Range> },
    /// `[text][id]`, `[text][]` or `[id]`: index into the link table.
    Reference(usize),
}

/// Events emitted by the inline parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineEvent {
    /// Plain text content.
    Text(Range),

    /// Inline code content (already trimmed, no further parsing).
    Code(Range),

    /// Start of emphasis (`*em*` or `_em_`).
    EmphasisStart,
    /// End of emphasis.
    EmphasisEnd,

    /// Start of strong emphasis (`**strong**` or `__strong__`).
    StrongStart,
    /// End of strong emphasis.
    StrongEnd,

    /// Start of a link.
    LinkStart(LinkTarget),
    /// End of a link.
    LinkEnd,

    /// Start of an image; the events up to `ImageEnd` are its alt text.
    ImageStart(LinkTarget),
    /// End of an image.
    ImageEnd,

    /// Autolink `<url>` or `<email>`.
    Autolink {
        /// The URL or address, without angle brackets.
        url: Range,
        is_email: bool,
    },

    /// Raw inline HTML (not escaped or parsed).
    Html(Range),

    /// Character reference such as `&copy;` or `&#169;`, passed through.
    Entity(Range),

    /// Soft line break (newline in source).
    SoftBreak,

    /// Hard line break (two or more spaces before the newline).
    HardBreak,

    /// Backslash escape - the escaped character.
    EscapedChar(u8),
}
