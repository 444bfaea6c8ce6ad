//! Compact byte ranges into a leaf block's joined text.
//!
//! Inline events refer to the text they were scanned from by offset
//! instead of owning copies. Offsets are `u32`; a single paragraph
//! larger than 4GB is not a supported input.

/// Half-open byte range `start..end` into an inline text buffer.
///
/// # Example
/// ```
/// use linemark::Range;
///
/// let text = b"Hello, World!";
/// let range = Range::new(7, 12);
/// assert_eq!(range.slice(text), b"World");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize offsets.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// The bytes this range covers.
    #[inline]
    pub fn slice<'a>(&self, text: &'a [u8]) -> &'a [u8] {
        &text[self.start as usize..self.end as usize]
    }

    /// The covered bytes as `&str`, if they fall on char boundaries.
    #[inline]
    pub fn try_slice_str<'a>(&self, text: &'a [u8]) -> Result<&'a str, std::str::Utf8Error> {
        std::str::from_utf8(self.slice(text))
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    #[inline]
    fn from(r: Range) -> Self {
        r.start as usize..r.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_slice() {
        let text = b"[foo](/url)";
        assert_eq!(Range::new(1, 4).slice(text), b"foo");
        assert_eq!(Range::new(6, 10).slice(text), b"/url");
    }

    #[test]
    fn test_range_empty() {
        let r = Range::new(3, 3);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.slice(b"abcdef"), b"");
    }

    #[test]
    fn test_range_str_boundaries() {
        let text = "héllo".as_bytes();
        assert_eq!(Range::new(0, 3).try_slice_str(text), Ok("hé"));
        assert!(Range::new(0, 2).try_slice_str(text).is_err());
    }

    #[test]
    fn test_range_std_conversions() {
        let r: Range = (2usize..5usize).into();
        assert_eq!(r, Range::new(2, 5));
        let back: std::ops::Range<usize> = r.into();
        assert_eq!(back, 2..5);
    }
}
