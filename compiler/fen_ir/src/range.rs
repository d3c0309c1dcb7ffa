//! Source locations.
//!
//! Every token and syntax-tree node carries a [`SourceRange`] so that faults
//! detected in any later stage (shuffling, qualification, type checking) can
//! point at the original source text.

use std::fmt;

/// A single position in a source file.
///
/// Layout: 12 bytes total
/// - offset: u32 - byte offset from file start
/// - line: u32 - 1-based line number
/// - column: u32 - 1-based column number (in characters)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Point {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Point {
    /// First position of a file.
    pub const START: Point = Point {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Create a new point.
    #[inline]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Point {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open region of source text, from `start` (inclusive) to `end`
/// (exclusive).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SourceRange {
    pub start: Point,
    pub end: Point,
}

impl SourceRange {
    /// Dummy range for generated code.
    pub const DUMMY: SourceRange = SourceRange {
        start: Point::START,
        end: Point::START,
    };

    /// Create a new range.
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        SourceRange { start, end }
    }

    /// Create a zero-length range at a single point.
    #[inline]
    pub const fn point(at: Point) -> Self {
        SourceRange { start: at, end: at }
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.offset - self.start.offset
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Check if a byte offset falls within this range.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start.offset && offset < self.end.offset
    }

    /// Merge two ranges to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: SourceRange) -> SourceRange {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        SourceRange { start, end }
    }
}

impl fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// Size assertions to prevent accidental regressions
mod size_asserts {
    use super::{Point, SourceRange};
    crate::static_assert_size!(Point, 12);
    crate::static_assert_size!(SourceRange, 24);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range_basic() {
        let range = SourceRange::new(Point::new(10, 2, 3), Point::new(20, 2, 13));
        assert_eq!(range.len(), 10);
        assert!(!range.is_empty());
        assert!(range.contains(15));
        assert!(!range.contains(20));
    }

    #[test]
    fn test_range_merge() {
        let a = SourceRange::new(Point::new(10, 1, 11), Point::new(20, 1, 21));
        let b = SourceRange::new(Point::new(15, 1, 16), Point::new(30, 2, 4));
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 10);
        assert_eq!(merged.end.offset, 30);
        assert_eq!(merged.end.line, 2);
    }

    #[test]
    fn test_range_merge_reversed_order() {
        let a = SourceRange::new(Point::new(20, 1, 21), Point::new(30, 1, 31));
        let b = SourceRange::new(Point::new(10, 1, 11), Point::new(25, 1, 26));
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 10);
        assert_eq!(merged.end.offset, 30);
    }

    #[test]
    fn test_range_point() {
        let point = SourceRange::point(Point::new(42, 3, 7));
        assert!(point.is_empty());
        assert_eq!(point.len(), 0);
    }

    #[test]
    fn test_display() {
        let range = SourceRange::new(Point::new(0, 1, 1), Point::new(3, 1, 4));
        assert_eq!(format!("{range}"), "1:1..1:4");
    }
}
