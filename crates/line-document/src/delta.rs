//! Structured edit deltas.
//!
//! Every document mutation is described by exactly one [`Delta`]. Anchors remap themselves
//! from it, and document-level listeners (undo managers, incremental consumers) receive it
//! without having to diff old and new text.
//!
//! Positions are expressed in document coordinates **at the time the delta is applied**.

use crate::position::{Position, Range};

/// Whether a delta adds or deletes text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaAction {
    /// Text was inserted between `start` and `end`.
    Insert,
    /// Text between `start` and `end` was removed.
    Remove,
}

/// Coarse classification of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// Insertion that does not consist of whole lines.
    InsertChars,
    /// Insertion of whole lines (starts and ends at column 0 on different rows).
    InsertLines,
    /// Removal that does not consist of whole lines.
    RemoveChars,
    /// Removal of whole lines (starts and ends at column 0 on different rows).
    RemoveLines,
}

/// A single edit.
///
/// Semantics:
/// - For [`DeltaAction::Insert`], `start` is the insertion point and `end` is where the
///   inserted text ends in the post-edit document.
/// - For [`DeltaAction::Remove`], `[start, end)` is the removed span in the pre-edit document.
/// - `lines` holds the inserted or removed text split on line breaks. It is never empty; a
///   single line break is `["", ""]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    /// Insert or remove.
    pub action: DeltaAction,
    /// Start of the edit.
    pub start: Position,
    /// End of the inserted text (insert) or of the removed span (remove).
    pub end: Position,
    /// Affected text, one entry per line.
    pub lines: Vec<String>,
}

impl Delta {
    /// Build an insertion delta at `start`, deriving `end` from `lines`.
    pub fn insert(start: Position, lines: Vec<String>) -> Self {
        let end = end_of_lines(start, &lines);
        Self {
            action: DeltaAction::Insert,
            start,
            end,
            lines,
        }
    }

    /// Build a removal delta for `[start, end)` with the removed `lines`.
    pub fn remove(start: Position, end: Position, lines: Vec<String>) -> Self {
        Self {
            action: DeltaAction::Remove,
            start,
            end,
            lines,
        }
    }

    /// The span covered by this delta.
    pub fn range(&self) -> Range {
        Range {
            start: self.start,
            end: self.end,
        }
    }

    /// Classify the delta.
    pub fn kind(&self) -> DeltaKind {
        let whole_lines =
            self.start.column == 0 && self.end.column == 0 && self.end.row > self.start.row;
        match (self.action, whole_lines) {
            (DeltaAction::Insert, false) => DeltaKind::InsertChars,
            (DeltaAction::Insert, true) => DeltaKind::InsertLines,
            (DeltaAction::Remove, false) => DeltaKind::RemoveChars,
            (DeltaAction::Remove, true) => DeltaKind::RemoveLines,
        }
    }

    /// Number of line breaks added or removed.
    pub fn row_span(&self) -> usize {
        self.end.row - self.start.row
    }

    /// `true` if the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The delta that undoes this one.
    pub fn invert(&self) -> Self {
        Self {
            action: match self.action {
                DeltaAction::Insert => DeltaAction::Remove,
                DeltaAction::Remove => DeltaAction::Insert,
            },
            start: self.start,
            end: self.end,
            lines: self.lines.clone(),
        }
    }

    /// The affected text, joined with LF.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Position reached after laying `lines` down starting at `start`.
pub(crate) fn end_of_lines(start: Position, lines: &[String]) -> Position {
    match lines {
        [] => start,
        [only] => Position::new(start.row, start.column + only.chars().count()),
        [.., last] => Position::new(start.row + lines.len() - 1, last.chars().count()),
    }
}
