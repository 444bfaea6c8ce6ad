//! Block-level decomposition.
//!
//! The engine is line-oriented and recursive. It handles:
//! - Paragraphs (and bare text in tight list items)
//! - Indented code
//! - Rulers
//! - ATX and setext headlines
//! - Block quotes
//! - Ordered and unordered lists

mod node;
mod parser;

pub use node::{Block, BlockContent, BlockKind, Leaves};
pub use parser::BlockParser;
