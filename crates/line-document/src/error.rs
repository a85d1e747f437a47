use thiserror::Error;

use crate::anchor::AnchorId;
use crate::position::{Position, Range};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by document mutations, reads and anchor operations.
///
/// Every operation validates its inputs completely before touching storage, so an error
/// never leaves the document or its anchors half-updated.
pub enum DocumentError {
    #[error("position {0} is outside the document")]
    /// A position (or one end of a range) lies outside current content.
    OutOfBounds(Position),

    #[error("invalid range {0}: end precedes start")]
    /// A range whose end is before its start.
    InvalidRange(Range),

    #[error("text for a single-line operation contains a line break")]
    /// A single-line operation received a line terminator.
    LineBreakInText,

    #[error("delta does not match the document: {0}")]
    /// A replayed or reverted delta does not fit the current content.
    DeltaMismatch(&'static str),

    #[error("anchor {0} is not attached to this document")]
    /// The anchor handle was detached or belongs to another document.
    UnknownAnchor(AnchorId),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DocumentError>;
