//! Nesting limits.
//!
//! These keep recursion bounded on pathological inputs such as a line of
//! ten thousand `>` characters.

/// Maximum nesting depth for block containers (lists, blockquotes).
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum nesting depth for inline spans (emphasis, links).
pub const MAX_INLINE_NESTING: usize = 32;

/// Maximum backtick run length for code spans; longer runs are literal text.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;
