//! Position and range primitives.
//!
//! Both types are plain values. Ordering is row-major, then by column, which is the
//! order every remap rule in [`crate::anchor`] relies on.

use std::cmp::Ordering;
use std::fmt;

/// Position coordinates (row and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Zero-based line index.
    pub row: usize,
    /// Zero-based column in characters within the line. May equal the line length.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(*self, *other)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row, column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Compare two positions row-major, then by column.
pub fn compare(a: Position, b: Position) -> Ordering {
    a.row.cmp(&b.row).then_with(|| a.column.cmp(&b.column))
}

/// Half-open span `[start, end)` of document content.
///
/// A well-formed range has `start <= end`. The fields are public, so a reversed range can
/// be constructed; [`Range::is_reversed`] detects it and mutating document operations
/// reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Range start (inclusive).
    pub start: Position,
    /// Range end (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a range from its four coordinates, as given.
    pub const fn new(
        start_row: usize,
        start_column: usize,
        end_row: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start: Position::new(start_row, start_column),
            end: Position::new(end_row, end_column),
        }
    }

    /// Create a range between two points, ordering them so that `start <= end`.
    pub fn from_points(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Empty range located at `position`.
    pub const fn empty(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// `true` when `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `true` when `end` precedes `start`.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// `true` when the range covers more than one row.
    pub fn is_multi_line(&self) -> bool {
        self.start.row != self.end.row
    }

    /// Half-open containment: `start <= position < end`.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Closed containment: `start <= position <= end`.
    pub fn contains_inclusive(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Check if two ranges overlap.
    ///
    /// Touching ranges (`a.end == b.start`) do not intersect. An empty range intersects a range
    /// that strictly contains its position.
    pub fn intersects(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Where `position` lies relative to the range.
    ///
    /// `Less` when it is before `start`, `Greater` when it is at or after `end`,
    /// `Equal` when it is inside.
    pub fn compare_point(&self, position: Position) -> Ordering {
        if position < self.start {
            Ordering::Less
        } else if position >= self.end {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl From<(Position, Position)> for Range {
    fn from((start, end): (Position, Position)) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
