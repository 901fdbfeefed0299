//! Line range tracking for structural diagnostics.

/// A range of physical lines in the source text.
///
/// Lines are zero-based and the range is half-open: `end` is the first line
/// *not* covered. A range reported at end of input therefore ends at the
/// number of lines consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct LineRange {
    /// First line (inclusive, zero-based).
    pub start: usize,
    /// Last line (exclusive).
    pub end: usize,
}

impl LineRange {
    /// Create a new range from start and end lines.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A range covering exactly one line.
    #[inline]
    pub fn line(line: usize) -> Self {
        Self {
            start: line,
            end: line + 1,
        }
    }

    /// Number of lines covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range covers no line at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extend this range to include another one.
    #[inline]
    pub fn extend(&self, other: LineRange) -> LineRange {
        LineRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Byte range of the covered lines in `source`.
    ///
    /// Lines past the end of `source` are clamped, so a range reported at end
    /// of input always maps to a valid (possibly empty) slice.
    pub fn byte_range(&self, source: &str) -> std::ops::Range<usize> {
        let mut offset = 0;
        let mut start = source.len();
        let mut end = source.len();
        for (index, line) in source.split_inclusive('\n').enumerate() {
            if index == self.start {
                start = offset;
            }
            offset += line.len();
            if index + 1 == self.end {
                end = offset;
                break;
            }
        }
        start.min(end)..end
    }

    /// Get the source text for this range.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.byte_range(source)]
    }
}

impl From<std::ops::Range<usize>> for LineRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        LineRange::new(range.start, range.end)
    }
}

impl From<LineRange> for std::ops::Range<usize> {
    fn from(range: LineRange) -> Self {
        range.start..range.end
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Humans count lines from one.
        if self.len() <= 1 {
            write!(f, "line {}", self.start + 1)
        } else {
            write!(f, "lines {}-{}", self.start + 1, self.end)
        }
    }
}
