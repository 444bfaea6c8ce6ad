//! Block decomposition engine.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::classify::{classify, LineKind};
use crate::limits::MAX_BLOCK_NESTING;
use crate::line::{link_neighbours, Line};

use super::node::{Block, BlockKind};

/// How a paragraph run came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunEnd {
    /// A blank line follows.
    Blank,
    /// A headline, ruler, quote (or list marker in list mode) follows.
    BlockStart,
    /// No lines left in this block.
    Exhausted,
}

/// Recursive block decomposition over owned lines.
///
/// Each call to [`split`](Self::split) scans a sequence of lines front to
/// back, moving every run it recognizes into a new child block. Quote and
/// list item contents are decomposed recursively after their prefixes are
/// stripped.
#[derive(Debug, Default)]
pub struct BlockParser {
    /// Times the nesting limit flattened a container.
    capped: usize,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompose a whole document into a ROOT block.
    pub fn parse(&mut self, lines: Vec<Line>) -> Block {
        let children = self.split_at(lines.into(), false, 0);
        log::debug!(
            "decomposed document into {} top-level blocks",
            children.len()
        );
        Block::node(BlockKind::Root, children)
    }

    /// Decompose `lines` into child blocks. `list_mode` is set for the
    /// contents of a list item.
    pub fn split(&mut self, lines: Vec<Line>, list_mode: bool) -> Vec<Block> {
        self.split_at(lines.into(), list_mode, 0)
    }

    /// How many containers were flattened by the nesting limit.
    pub fn capped(&self) -> usize {
        self.capped
    }

    fn split_at(&mut self, mut lines: VecDeque<Line>, list_mode: bool, depth: usize) -> Vec<Block> {
        let mut children = Vec::new();

        while let Some(first) = lines.front() {
            let kind = classify(first, lines.get(1));
            match kind {
                LineKind::Empty => {
                    lines.pop_front();
                }
                LineKind::Code => {
                    let mut n = lines
                        .iter()
                        .take_while(|l| l.is_blank() || l.leading() >= 4)
                        .count();
                    while lines[n - 1].is_blank() {
                        n -= 1;
                    }
                    push(&mut children, Block::leaf(BlockKind::Code, take(&mut lines, n)));
                }
                LineKind::Ruler => {
                    push(&mut children, Block::leaf(BlockKind::Ruler, take(&mut lines, 1)));
                }
                LineKind::Headline { level } => {
                    let mut heading = take(&mut lines, 1);
                    for line in &mut heading {
                        strip_atx_markers(line);
                    }
                    push(&mut children, Block::leaf(BlockKind::Headline { level }, heading));
                }
                LineKind::Setext { level } => {
                    let heading = take(&mut lines, 1);
                    lines.pop_front();
                    if let Some(next) = lines.front_mut() {
                        next.prev_empty = true;
                    }
                    push(&mut children, Block::leaf(BlockKind::Headline { level }, heading));
                }
                LineKind::Quote => {
                    let block = self.quote_run(&mut lines, depth);
                    push(&mut children, block);
                }
                LineKind::OrderedList { .. } | LineKind::UnorderedList { .. } => {
                    let block = self.list_run(&mut lines, kind, depth);
                    push(&mut children, block);
                }
                LineKind::Other => {
                    let block = paragraph_run(&mut lines, list_mode, children.is_empty());
                    push(&mut children, block);
                }
            }
        }

        if list_mode && children.iter().any(|b| b.kind == BlockKind::Paragraph) {
            for child in &mut children {
                if child.kind == BlockKind::None {
                    child.kind = BlockKind::Paragraph;
                }
            }
        }
        children
    }

    /// Consume a block quote and decompose its body.
    fn quote_run(&mut self, lines: &mut VecDeque<Line>, depth: usize) -> Block {
        let mut n = 1;
        while n < lines.len() {
            let line = &lines[n];
            if !line.is_blank()
                && line.prev_empty()
                && line.leading() == 0
                && !line.text().starts_with('>')
            {
                break;
            }
            n += 1;
        }

        let mut body = take(lines, n);
        trim_trailing_blanks(&mut body);
        if depth >= MAX_BLOCK_NESTING {
            return self.flatten(body);
        }

        for line in &mut body {
            strip_quote_prefix(line);
        }
        link_neighbours(&mut body);
        Block::node(
            BlockKind::BlockQuote,
            self.split_at(body.into(), false, depth + 1),
        )
    }

    /// Consume a list, split it into items and decompose each item.
    fn list_run(&mut self, lines: &mut VecDeque<Line>, kind: LineKind, depth: usize) -> Block {
        let mut n = 1;
        while n < lines.len() {
            let line = &lines[n];
            if !line.is_blank()
                && line.prev_empty()
                && line.leading() == 0
                && !classify(line, None).is_list()
            {
                break;
            }
            n += 1;
        }

        let mut run = take(lines, n);
        trim_trailing_blanks(&mut run);
        if let Some(first) = run.first_mut() {
            first.prev_empty = false;
        }
        if let Some(last) = run.last_mut() {
            last.next_empty = false;
        }
        if depth >= MAX_BLOCK_NESTING {
            return self.flatten(run);
        }

        let mut starts: SmallVec<[usize; 8]> = SmallVec::new();
        starts.push(0);
        for (i, line) in run.iter().enumerate().skip(1) {
            if line.is_blank() {
                continue;
            }
            if classify(line, None).is_list() || (line.prev_empty() && line.leading() == 0) {
                starts.push(i);
            }
        }

        let mut items = Vec::with_capacity(starts.len());
        for &start in starts.iter().skip(1).rev() {
            items.push(run.split_off(start));
        }
        items.push(run);
        items.reverse();

        let children = items
            .into_iter()
            .map(|mut item| {
                strip_list_indent(&mut item);
                Block::node(
                    BlockKind::ListItem,
                    self.split_at(item.into(), true, depth + 1),
                )
            })
            .collect();

        let list_kind = match kind {
            LineKind::OrderedList { .. } => BlockKind::OrderedList,
            _ => BlockKind::UnorderedList,
        };
        Block::node(list_kind, children)
    }

    /// Nesting limit reached: keep the remaining text as one paragraph.
    fn flatten(&mut self, lines: Vec<Line>) -> Block {
        self.capped += 1;
        log::warn!(
            "block nesting exceeds {}, flattening {} lines into a paragraph",
            MAX_BLOCK_NESTING,
            lines.len()
        );
        let lines = lines.into_iter().filter(|l| !l.is_blank()).collect();
        Block::leaf(BlockKind::Paragraph, lines)
    }
}

/// Consume consecutive text lines.
fn paragraph_run(lines: &mut VecDeque<Line>, list_mode: bool, first_child: bool) -> Block {
    let was_empty = lines[0].prev_empty();
    let mut n = 1;
    let mut end = RunEnd::Exhausted;
    while n < lines.len() {
        let line = &lines[n];
        if line.is_blank() {
            end = RunEnd::Blank;
            break;
        }
        if classify(line, lines.get(n + 1)).starts_block(list_mode) {
            end = RunEnd::BlockStart;
            break;
        }
        n += 1;
    }

    let bare = list_mode
        && !was_empty
        && match end {
            RunEnd::Blank => false,
            RunEnd::BlockStart => first_child,
            RunEnd::Exhausted => true,
        };
    let kind = if bare {
        BlockKind::None
    } else {
        BlockKind::Paragraph
    };
    Block::leaf(kind, take(lines, n))
}

#[inline]
fn take(lines: &mut VecDeque<Line>, n: usize) -> Vec<Line> {
    lines.drain(..n).collect()
}

fn push(children: &mut Vec<Block>, block: Block) {
    log::trace!("split {:?} ({} lines)", block.kind, block.lines().len());
    children.push(block);
}

fn trim_trailing_blanks(lines: &mut Vec<Line>) {
    while lines.last().is_some_and(Line::is_blank) {
        lines.pop();
    }
}

/// Drop `>` and one following space.
fn strip_quote_prefix(line: &mut Line) {
    if line.is_blank() {
        return;
    }
    let bytes = line.text().as_bytes();
    let lead = line.leading();
    if bytes[lead] != b'>' {
        return;
    }
    let cut = if bytes.get(lead + 1) == Some(&b' ') {
        lead + 2
    } else {
        lead + 1
    };
    line.strip_prefix(cut);
}

/// Drop the marker from the first line and up to four columns of
/// indentation from the others.
fn strip_list_indent(item: &mut [Line]) {
    for (i, line) in item.iter_mut().enumerate() {
        let marker_end = if i == 0 {
            classify(line, None).marker_end()
        } else {
            None
        };
        let cut = marker_end.unwrap_or_else(|| line.leading().min(4));
        line.strip_prefix(cut);
    }
}

/// `## Title ##` -> `Title`. Every trailing `#` goes, spaced or not.
fn strip_atx_markers(line: &mut Line) {
    let text = line
        .content()
        .trim_start_matches('#')
        .trim_start_matches(' ')
        .trim_end_matches('#')
        .trim_end_matches(' ')
        .to_string();
    line.set_text(text);
}
