//! Source locations for syntax-tree nodes and diagnostics.
//!
//! A [`Location`] combines the toolchain-wide 1-based line/column
//! convention with an absolute `[start, end)` character-offset range.

use std::fmt;

use serde::Serialize;

/// A resolved source location.
///
/// Lines and columns are 1-based; `range_start`/`range_end` are absolute
/// character offsets into the document with `[start, end)` semantics.
/// The grammar engine reports failures with 0-based columns — those raw
/// positions are converted to this convention by the diagnostic mapper
/// before they leave the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    first_line: usize,
    first_column: usize,
    last_line: usize,
    last_column: usize,
    range_start: usize,
    range_end: usize,
}

impl Location {
    /// Create a location from line/column pairs and an offset range.
    pub fn new(
        first_line: usize,
        first_column: usize,
        last_line: usize,
        last_column: usize,
        range: std::ops::Range<usize>,
    ) -> Self {
        Self {
            first_line,
            first_column,
            last_line,
            last_column,
            range_start: range.start,
            range_end: range.end,
        }
    }

    /// Line of the first character (1-based).
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Column of the first character.
    pub fn first_column(&self) -> usize {
        self.first_column
    }

    /// Line of the last character (1-based).
    pub fn last_line(&self) -> usize {
        self.last_line
    }

    /// Column just past the last character.
    pub fn last_column(&self) -> usize {
        self.last_column
    }

    /// Absolute offset of the first character.
    pub fn range_start(&self) -> usize {
        self.range_start
    }

    /// Absolute offset just past the last character.
    pub fn range_end(&self) -> usize {
        self.range_end
    }

    /// Create a union of two locations (encompassing both).
    pub fn union(&self, other: Location) -> Location {
        let (first_line, first_column) =
            if (self.first_line, self.first_column) <= (other.first_line, other.first_column) {
                (self.first_line, self.first_column)
            } else {
                (other.first_line, other.first_column)
            };
        let (last_line, last_column) =
            if (self.last_line, self.last_column) >= (other.last_line, other.last_column) {
                (self.last_line, self.last_column)
            } else {
                (other.last_line, other.last_column)
            };

        Location {
            first_line,
            first_column,
            last_line,
            last_column,
            range_start: self.range_start.min(other.range_start),
            range_end: self.range_end.max(other.range_end),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 1, 1, 1, 0..0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first_line, self.first_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_accessors() {
        let loc = Location::new(2, 5, 2, 10, 14..19);
        assert_eq!(loc.first_line(), 2);
        assert_eq!(loc.first_column(), 5);
        assert_eq!(loc.last_line(), 2);
        assert_eq!(loc.last_column(), 10);
        assert_eq!(loc.range_start(), 14);
        assert_eq!(loc.range_end(), 19);
    }

    #[test]
    fn test_location_union() {
        let a = Location::new(1, 3, 1, 8, 2..7);
        let b = Location::new(2, 1, 3, 4, 10..24);
        let union = a.union(b);

        assert_eq!(union.first_line(), 1);
        assert_eq!(union.first_column(), 3);
        assert_eq!(union.last_line(), 3);
        assert_eq!(union.last_column(), 4);
        assert_eq!(union.range_start(), 2);
        assert_eq!(union.range_end(), 24);
    }

    #[test]
    fn test_location_union_same_line() {
        let a = Location::new(1, 9, 1, 12, 8..11);
        let b = Location::new(1, 2, 1, 5, 1..4);
        let union = a.union(b);

        assert_eq!(union.first_column(), 2);
        assert_eq!(union.last_column(), 12);
        assert_eq!(union.range_start(), 1);
        assert_eq!(union.range_end(), 11);
    }

    #[test]
    fn test_location_display() {
        let loc = Location::new(3, 7, 3, 9, 0..0);
        assert_eq!(loc.to_string(), "3:7");
    }
}
