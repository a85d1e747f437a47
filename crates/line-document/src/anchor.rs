//! Anchors: positions that follow edits.
//!
//! An anchor is a `(row, column)` marker registered with one [`Document`](crate::Document).
//! The holder keeps an [`AnchorId`] handle; the document keeps the tracked state in its
//! anchor registry and hands every [`Delta`] to it, in registration order, before the
//! mutating call returns.
//!
//! Each anchor remaps itself with [`transform_point`] and notifies its listeners only when
//! its position actually changed.
//!
//! # Tie-break at the edit point
//!
//! For an insertion exactly at the anchor:
//!
//! - `insert_right == false` (default): the anchor moves with the text and ends up after it.
//! - `insert_right == true`: the text is inserted to the right of the anchor, which stays put.
//!
//! Removals never need the flag: an anchor inside the removed span collapses to its start,
//! and an anchor at or after the end shifts back by the removed span.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::delta::{Delta, DeltaAction};
use crate::position::Position;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Handle to an anchor registered with a document.
///
/// The handle is the anchor's non-owning link back to its document: it records which
/// document it belongs to, and that document's methods reject handles from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnchorId {
    document: DocumentId,
    serial: u64,
}

impl AnchorId {
    /// The document this anchor was created on.
    pub fn document(&self) -> DocumentId {
        self.document
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/anchor#{}", self.document, self.serial)
    }
}

/// Notification delivered to anchor listeners when an anchor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorChange {
    /// The anchor that moved.
    pub anchor: AnchorId,
    /// Position before the move.
    pub old: Position,
    /// Position after the move.
    pub value: Position,
}

/// Anchor change callback function type
pub type AnchorChangeCallback = Box<dyn FnMut(&AnchorChange) + Send>;

/// Tracked state of one attached anchor.
pub struct Anchor {
    id: AnchorId,
    position: Position,
    insert_right: bool,
    listeners: Vec<AnchorChangeCallback>,
}

impl Anchor {
    /// The anchor's handle.
    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// The document this anchor belongs to.
    pub fn document(&self) -> DocumentId {
        self.id.document
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current row.
    pub fn row(&self) -> usize {
        self.position.row
    }

    /// Current column.
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Tie-break flag; see the [module docs](self).
    pub fn insert_right(&self) -> bool {
        self.insert_right
    }

    /// Remap through `delta`.
    fn apply_delta(&mut self, delta: &Delta) {
        // Single-row edits on another row, and edits starting on a later row, never
        // affect this anchor.
        if delta.start.row == delta.end.row && delta.start.row != self.position.row {
            return;
        }
        if delta.start.row > self.position.row {
            return;
        }
        let point = transform_point(delta, self.position, self.insert_right);
        self.move_to(point);
    }

    /// Set the position and notify listeners. Returns `true` if it changed.
    fn move_to(&mut self, position: Position) -> bool {
        if position == self.position {
            return false;
        }
        let change = AnchorChange {
            anchor: self.id,
            old: self.position,
            value: position,
        };
        log::trace!("{} moved {} -> {}", self.id, change.old, change.value);
        self.position = position;
        for listener in &mut self.listeners {
            listener(&change);
        }
        true
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anchor")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("insert_right", &self.insert_right)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// `a` comes before `b`; equal points count as in order when `equal_in_order` is set.
fn points_in_order(a: Position, b: Position, equal_in_order: bool) -> bool {
    a < b || (a == b && equal_in_order)
}

/// Remap `point` through `delta`.
///
/// This is a total function: for any point and any delta produced by a document it
/// returns the point's position in the post-edit document.
///
/// - Points before the edit are unchanged.
/// - Points after the edit shift by its row delta; points on the edit's last row also
///   shift by its column delta.
/// - Points inside a removed span collapse to the span start.
/// - A point exactly at an insertion point stays when `insert_right` is set and moves to
///   the end of the inserted text otherwise.
pub fn transform_point(delta: &Delta, point: Position, insert_right: bool) -> Position {
    let is_insert = delta.action == DeltaAction::Insert;
    // In pre-edit coordinates an insertion occupies no space.
    let edit_end = if is_insert { delta.start } else { delta.end };

    if points_in_order(point, delta.start, insert_right) {
        return point;
    }

    if points_in_order(edit_end, point, !insert_right) {
        let rows = delta.end.row - delta.start.row;
        return if is_insert {
            let column = if point.row == delta.start.row {
                point.column - delta.start.column + delta.end.column
            } else {
                point.column
            };
            Position::new(point.row + rows, column)
        } else {
            let column = if point.row == delta.end.row {
                point.column - delta.end.column + delta.start.column
            } else {
                point.column
            };
            Position::new(point.row - rows, column)
        };
    }

    delta.start
}

/// Anchor registry owned by a document.
///
/// Entries stay in registration order, which is also the notification order. Serials grow
/// monotonically, so lookups are a binary search.
pub(crate) struct AnchorSet {
    document: DocumentId,
    next_serial: u64,
    entries: Vec<Anchor>,
}

impl AnchorSet {
    pub(crate) fn new(document: DocumentId) -> Self {
        Self {
            document,
            next_serial: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn create(&mut self, position: Position, insert_right: bool) -> AnchorId {
        let id = AnchorId {
            document: self.document,
            serial: self.next_serial,
        };
        self.next_serial += 1;
        self.entries.push(Anchor {
            id,
            position,
            insert_right,
            listeners: Vec::new(),
        });
        id
    }

    fn index_of(&self, id: AnchorId) -> Option<usize> {
        if id.document != self.document {
            return None;
        }
        self.entries
            .binary_search_by_key(&id.serial, |anchor| anchor.id.serial)
            .ok()
    }

    pub(crate) fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.index_of(id).map(|idx| &self.entries[idx])
    }

    pub(crate) fn set_insert_right(&mut self, id: AnchorId, insert_right: bool) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.entries[idx].insert_right = insert_right;
                true
            }
            None => false,
        }
    }

    pub(crate) fn subscribe(&mut self, id: AnchorId, callback: AnchorChangeCallback) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.entries[idx].listeners.push(callback);
                true
            }
            None => false,
        }
    }

    /// Move an anchor explicitly. `None` if the anchor is unknown.
    pub(crate) fn move_to(&mut self, id: AnchorId, position: Position) -> Option<bool> {
        let idx = self.index_of(id)?;
        Some(self.entries[idx].move_to(position))
    }

    pub(crate) fn remove(&mut self, id: AnchorId) -> Option<Anchor> {
        let idx = self.index_of(id)?;
        Some(self.entries.remove(idx))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver a delta to every anchor, in registration order.
    pub(crate) fn dispatch(&mut self, delta: &Delta) {
        for anchor in &mut self.entries {
            anchor.apply_delta(delta);
        }
    }
}
