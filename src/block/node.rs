//! Block tree nodes.

use crate::line::Line;

/// Syntactic kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Bare text inside a tight list item; rendered without `<p>`.
    None,
    Paragraph,
    Code,
    BlockQuote,
    Ruler,
    Headline {
        /// 1-6.
        level: u8,
    },
    OrderedList,
    UnorderedList,
    ListItem,
    Root,
}

impl BlockKind {
    /// Kinds that always own child blocks rather than lines.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(
            self,
            BlockKind::BlockQuote
                | BlockKind::OrderedList
                | BlockKind::UnorderedList
                | BlockKind::ListItem
                | BlockKind::Root
        )
    }
}

/// What a block owns: raw lines (leaf) or child blocks (internal node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Lines(Vec<Line>),
    Children(Vec<Block>),
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub content: BlockContent,
}

impl Block {
    pub fn leaf(kind: BlockKind, lines: Vec<Line>) -> Self {
        Self {
            kind,
            content: BlockContent::Lines(lines),
        }
    }

    pub fn node(kind: BlockKind, children: Vec<Block>) -> Self {
        Self {
            kind,
            content: BlockContent::Children(children),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, BlockContent::Lines(_))
    }

    /// Lines of a leaf; empty for internal nodes.
    #[inline]
    pub fn lines(&self) -> &[Line] {
        match &self.content {
            BlockContent::Lines(lines) => lines,
            BlockContent::Children(_) => &[],
        }
    }

    /// Children of an internal node; empty for leaves.
    #[inline]
    pub fn children(&self) -> &[Block] {
        match &self.content {
            BlockContent::Children(children) => children,
            BlockContent::Lines(_) => &[],
        }
    }

    /// Depth-first iterator over every leaf under (and including) this block.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }
}

/// Iterator returned by [`Block::leaves`].
pub struct Leaves<'a> {
    stack: Vec<&'a Block>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(block) = self.stack.pop() {
            match &block.content {
                BlockContent::Lines(_) => return Some(block),
                BlockContent::Children(children) => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}
