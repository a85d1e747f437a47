#![warn(missing_docs)]
//! Line Document - Text Buffer with Live Anchors
//!
//! # Overview
//!
//! `line-document` is a headless, line-oriented text buffer. Besides structural edits it
//! tracks **anchors**: `(row, column)` markers that stay attached to the same logical spot in
//! the text while the document is edited around them. Cursors, selection endpoints,
//! bookmarks and diagnostics markers are all built on anchors.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (mutations, reads, replay)        │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Anchors (remap + change notifications)     │  ← Position tracking
//! ├─────────────────────────────────────────────┤
//! │  Delta (one structured edit)                │  ← Change description
//! ├─────────────────────────────────────────────┤
//! │  Line Store (Rope-based, LF-normalized)     │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use line_document::{Document, Position, Range};
//!
//! let mut doc = Document::new("juhu\nkinners\n123");
//! let anchor = doc.create_anchor(1, 5);
//!
//! doc.on_anchor_change(anchor, |change| {
//!     println!("{} moved {} -> {}", change.anchor, change.old, change.value);
//! })
//! .unwrap();
//!
//! doc.remove_full_lines(1, 1).unwrap();
//! assert_eq!(doc.anchor_position(anchor).unwrap(), Position::new(1, 0));
//!
//! doc.remove(Range::new(0, 2, 1, 2)).unwrap();
//! assert_eq!(doc.get_value(), "ju3");
//! ```
//!
//! # Module Description
//!
//! - [`position`] - `Position` / `Range` value types and ordering
//! - [`line_ending`] - line break detection, splitting and re-expansion
//! - [`delta`] - structured edit description
//! - [`anchor`] - anchor handles, the remap function and change notifications
//! - [`document`] - the document and its mutation API
//!
//! # Unicode
//!
//! Columns count Unicode scalar values (`char`), not bytes.

pub mod anchor;
pub mod delta;
pub mod document;
mod error;
pub mod line_ending;
mod line_store;
pub mod position;

pub use anchor::{Anchor, AnchorChange, AnchorChangeCallback, AnchorId, DocumentId, transform_point};
pub use delta::{Delta, DeltaAction, DeltaKind};
pub use document::{DeltaCallback, Document, DocumentOptions};
pub use error::{DocumentError, Result};
pub use line_ending::{LineEnding, NewLineMode};
pub use position::{Position, Range, compare};
