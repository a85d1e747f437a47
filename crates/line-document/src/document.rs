//! The mutable, line-oriented document.
//!
//! # Overview
//!
//! [`Document`] owns LF-normalized line storage and is the only way to mutate it. Every
//! mutation goes through the same pipeline:
//!
//! 1. **Validation**: positions and ranges are checked against current content. Nothing is
//!    touched if validation fails.
//! 2. **Delta**: the edit is described as a [`Delta`] in pre-edit coordinates.
//! 3. **Storage**: the delta is applied to the line store.
//! 4. **Anchors**: every attached anchor remaps itself, in registration order, and fires
//!    its own listeners if it moved.
//! 5. **Listeners**: document-level listeners receive the delta.
//!
//! All of this happens before the mutating call returns.
//!
//! # Example
//!
//! ```rust
//! use line_document::{Document, Position};
//!
//! let mut doc = Document::new("juhu\nkinners");
//! let anchor = doc.create_anchor(1, 4);
//!
//! doc.insert(Position::new(1, 1), "123").unwrap();
//! assert_eq!(doc.anchor_position(anchor).unwrap(), Position::new(1, 7));
//! assert_eq!(doc.get_line(1).as_deref(), Some("k123inners"));
//! ```

use std::fmt;

use crate::anchor::{Anchor, AnchorChange, AnchorId, AnchorSet, DocumentId};
use crate::delta::{Delta, DeltaAction, end_of_lines};
use crate::error::{DocumentError, Result};
use crate::line_ending::{self, LineEnding, NewLineMode};
use crate::line_store::LineStore;
use crate::position::{Position, Range};

/// Document change callback function type
pub type DeltaCallback = Box<dyn FnMut(&Delta) + Send>;

/// Construction options for a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentOptions {
    /// How the serialized newline sequence is chosen.
    pub new_line_mode: NewLineMode,
}

impl DocumentOptions {
    /// Use the given newline mode.
    pub fn with_new_line_mode(mut self, mode: NewLineMode) -> Self {
        self.new_line_mode = mode;
        self
    }
}

/// A line-oriented text buffer with live anchors.
///
/// Positions are `(row, column)` pairs, columns counted in characters. The document always
/// has at least one line; a trailing line break yields an empty last line.
pub struct Document {
    id: DocumentId,
    store: LineStore,
    new_line_mode: NewLineMode,
    /// Line ending detected from loaded text, used in [`NewLineMode::Auto`].
    detected_line_ending: Option<LineEnding>,
    anchors: AnchorSet,
    listeners: Vec<DeltaCallback>,
}

impl Document {
    /// Create a document from text, normalizing line endings.
    pub fn new(text: &str) -> Self {
        Self::with_options(text, DocumentOptions::default())
    }

    /// Create a document from text with explicit options.
    pub fn with_options(text: &str, options: DocumentOptions) -> Self {
        let id = DocumentId::next();
        let detected_line_ending = LineEnding::detect_in_text(text);
        log::debug!("{id}: created, detected line ending {detected_line_ending:?}");
        Self {
            id,
            store: LineStore::from_text(&line_ending::normalize(text)),
            new_line_mode: options.new_line_mode,
            detected_line_ending,
            anchors: AnchorSet::new(id),
            listeners: Vec::new(),
        }
    }

    /// Create a document from pre-split lines.
    ///
    /// Lines that themselves contain terminators are split further.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect();
        Self::new(&lines.join("\n"))
    }

    /// Identity of this document.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    // ----------------------------------------------------------------------------------
    // Line endings
    // ----------------------------------------------------------------------------------

    /// Current newline mode.
    pub fn new_line_mode(&self) -> NewLineMode {
        self.new_line_mode
    }

    /// Change the newline mode used for serialization.
    pub fn set_new_line_mode(&mut self, mode: NewLineMode) {
        self.new_line_mode = mode;
    }

    /// Line ending that [`get_value`](Self::get_value) will use.
    pub fn line_ending(&self) -> LineEnding {
        match self.new_line_mode {
            NewLineMode::Auto => self.detected_line_ending.unwrap_or_default(),
            NewLineMode::Unix => LineEnding::Lf,
            NewLineMode::Windows => LineEnding::Crlf,
        }
    }

    /// Newline sequence that [`get_value`](Self::get_value) will use.
    pub fn new_line_character(&self) -> &'static str {
        self.line_ending().as_str()
    }

    fn detect_new_line(&mut self, text: &str) {
        self.detected_line_ending = LineEnding::detect_in_text(text);
        log::debug!(
            "{}: re-detected line ending {:?}",
            self.id,
            self.detected_line_ending
        );
    }

    // ----------------------------------------------------------------------------------
    // Reads
    // ----------------------------------------------------------------------------------

    /// Full text with line terminators re-expanded per the newline mode.
    pub fn get_value(&self) -> String {
        self.line_ending().apply_to_text(&self.store.text())
    }

    /// Full LF-normalized text.
    pub fn text(&self) -> String {
        self.store.text()
    }

    /// Number of lines.
    pub fn get_length(&self) -> usize {
        self.store.line_count()
    }

    /// Total character count of the LF-normalized text.
    pub fn char_count(&self) -> usize {
        self.store.char_count()
    }

    /// Text of one line, without terminator.
    pub fn get_line(&self, row: usize) -> Option<String> {
        self.store.line(row)
    }

    /// Length of one line in characters.
    pub fn line_len(&self, row: usize) -> Option<usize> {
        self.store.line_len(row)
    }

    /// Lines `first..=last`, clamped to the document.
    pub fn get_lines(&self, first: usize, last: usize) -> Vec<String> {
        let last = last.min(self.get_length() - 1);
        (first..=last).filter_map(|row| self.store.line(row)).collect()
    }

    /// All lines.
    pub fn get_all_lines(&self) -> Vec<String> {
        self.get_lines(0, self.get_length() - 1)
    }

    /// Text of `range`, joined with the document's newline sequence.
    pub fn get_text_range(&self, range: Range) -> Result<String> {
        self.check_range(range)?;
        Ok(self
            .line_ending()
            .apply_to_text(&self.store.slice(range.start, range.end)))
    }

    /// Text of `range`, one entry per line.
    pub fn get_lines_for_range(&self, range: Range) -> Result<Vec<String>> {
        self.check_range(range)?;
        Ok(self.slice_lines(range.start, range.end))
    }

    fn slice_lines(&self, start: Position, end: Position) -> Vec<String> {
        self.store
            .slice(start, end)
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    // ----------------------------------------------------------------------------------
    // Position helpers
    // ----------------------------------------------------------------------------------

    /// `true` if `position` addresses existing content (column may equal line length).
    pub fn is_valid_position(&self, position: Position) -> bool {
        self.store
            .line_len(position.row)
            .is_some_and(|len| position.column <= len)
    }

    /// Clamp `position` into the document.
    ///
    /// A row past the end maps to the end of the last line.
    pub fn clip_position(&self, position: Position) -> Position {
        let last_row = self.get_length() - 1;
        if position.row > last_row {
            return Position::new(last_row, self.store.line_len(last_row).unwrap_or(0));
        }
        let len = self.store.line_len(position.row).unwrap_or(0);
        Position::new(position.row, position.column.min(len))
    }

    /// Character offset of `position` in the serialized text ([`get_value`](Self::get_value)).
    ///
    /// The position is clipped first.
    pub fn position_to_index(&self, position: Position) -> usize {
        let position = self.clip_position(position);
        let extra = self.new_line_character().chars().count() - 1;
        self.store.position_to_char(position) + position.row * extra
    }

    /// Position of a character offset in the serialized text.
    ///
    /// Offsets past the end map to the end of the document; an offset inside a two-character
    /// newline maps to the end of its line.
    pub fn index_to_position(&self, index: usize) -> Position {
        let newline_len = self.new_line_character().chars().count();
        if newline_len == 1 {
            return self.store.char_to_position(index);
        }
        let mut remaining = index;
        let last_row = self.get_length() - 1;
        for row in 0..last_row {
            let len = self.store.line_len(row).unwrap_or(0);
            if remaining < len + newline_len {
                return Position::new(row, remaining.min(len));
            }
            remaining -= len + newline_len;
        }
        let len = self.store.line_len(last_row).unwrap_or(0);
        Position::new(last_row, remaining.min(len))
    }

    fn check_position(&self, position: Position) -> Result<()> {
        if self.is_valid_position(position) {
            Ok(())
        } else {
            Err(DocumentError::OutOfBounds(position))
        }
    }

    fn check_range(&self, range: Range) -> Result<()> {
        if range.is_reversed() {
            return Err(DocumentError::InvalidRange(range));
        }
        self.check_position(range.start)?;
        self.check_position(range.end)
    }

    // ----------------------------------------------------------------------------------
    // Mutations
    // ----------------------------------------------------------------------------------

    /// Insert `text` at `position`.
    ///
    /// Any of CR, LF or CRLF in `text` splits the line at `position`: the part before stays
    /// on the first row and the part after is appended to the last inserted row.
    ///
    /// Returns the range now covered by the inserted text.
    ///
    /// # Errors
    ///
    /// [`DocumentError::OutOfBounds`] if `position` is outside current content.
    pub fn insert(&mut self, position: Position, text: &str) -> Result<Range> {
        self.check_position(position)?;
        if self.get_length() <= 1 {
            self.detect_new_line(text);
        }
        if text.is_empty() {
            return Ok(Range::empty(position));
        }
        let delta = Delta::insert(position, line_ending::split_lines(text));
        let range = delta.range();
        self.commit(&delta);
        Ok(range)
    }

    /// Insert text that contains no line break into one line.
    ///
    /// # Errors
    ///
    /// [`DocumentError::LineBreakInText`] if `text` contains a terminator,
    /// [`DocumentError::OutOfBounds`] if `position` is outside current content.
    pub fn insert_in_line(&mut self, position: Position, text: &str) -> Result<Range> {
        if line_ending::contains_line_break(text) {
            return Err(DocumentError::LineBreakInText);
        }
        self.check_position(position)?;
        if text.is_empty() {
            return Ok(Range::empty(position));
        }
        let delta = Delta::insert(position, vec![text.to_string()]);
        let range = delta.range();
        self.commit(&delta);
        Ok(range)
    }

    /// Insert whole lines before `row`, clamping `row` into `[0, line count]`.
    ///
    /// Rows at or after `row` move down by `lines.len()`. With `row == line count` the lines
    /// are appended after the last line. The inserted block never merges with a neighbouring
    /// line. Elements containing terminators are split into several lines.
    pub fn insert_full_lines<S: AsRef<str>>(&mut self, row: usize, lines: &[S]) -> Range {
        let len = self.get_length();
        let row = row.min(len);
        let mut block: Vec<String> = lines
            .iter()
            .flat_map(|line| line_ending::split_lines(line.as_ref()))
            .collect();
        if block.is_empty() {
            return Range::empty(self.clip_position(Position::new(row, 0)));
        }

        let start = if row < len {
            block.push(String::new());
            Position::new(row, 0)
        } else {
            block.insert(0, String::new());
            let last = len - 1;
            Position::new(last, self.store.line_len(last).unwrap_or(0))
        };

        let delta = Delta::insert(start, block);
        let range = delta.range();
        self.commit(&delta);
        range
    }

    /// Checked form of [`insert_full_lines`](Self::insert_full_lines).
    ///
    /// # Errors
    ///
    /// [`DocumentError::OutOfBounds`] if `row` is greater than the line count.
    pub fn insert_lines<S: AsRef<str>>(&mut self, row: usize, lines: &[S]) -> Result<Range> {
        if row > self.get_length() {
            return Err(DocumentError::OutOfBounds(Position::new(row, 0)));
        }
        Ok(self.insert_full_lines(row, lines))
    }

    /// Insert a block of lines at `position`, merging its ends with the split line.
    ///
    /// The first element is appended to the text before `position`; the text after
    /// `position` is appended to the last element. `["", ""]` therefore inserts one line
    /// break.
    ///
    /// # Errors
    ///
    /// [`DocumentError::LineBreakInText`] if an element contains a terminator,
    /// [`DocumentError::OutOfBounds`] if `position` is outside current content.
    pub fn insert_merged_lines<S: AsRef<str>>(
        &mut self,
        position: Position,
        lines: &[S],
    ) -> Result<Range> {
        if lines
            .iter()
            .any(|line| line_ending::contains_line_break(line.as_ref()))
        {
            return Err(DocumentError::LineBreakInText);
        }
        self.check_position(position)?;
        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        if lines.is_empty() || (lines.len() == 1 && lines[0].is_empty()) {
            return Ok(Range::empty(position));
        }
        let delta = Delta::insert(position, lines);
        let range = delta.range();
        self.commit(&delta);
        Ok(range)
    }

    /// Remove the content of `range` and return it, joined with the document's newline
    /// sequence.
    ///
    /// Partial first and last rows are joined; rows in between are dropped.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidRange`] if `range` is reversed,
    /// [`DocumentError::OutOfBounds`] if either end is outside current content.
    pub fn remove(&mut self, range: Range) -> Result<String> {
        self.check_range(range)?;
        if range.is_empty() {
            return Ok(String::new());
        }
        let delta = Delta::remove(
            range.start,
            range.end,
            self.slice_lines(range.start, range.end),
        );
        let removed = self.line_ending().apply_to_text(&delta.text());
        self.commit(&delta);
        Ok(removed)
    }

    /// Remove columns `start_column..end_column` of one row.
    pub fn remove_in_line(
        &mut self,
        row: usize,
        start_column: usize,
        end_column: usize,
    ) -> Result<String> {
        self.remove(Range::new(row, start_column, row, end_column))
    }

    /// Remove rows `first_row..=last_row` as whole lines and return them.
    ///
    /// Both rows are clamped into the document. When the block reaches the last row and does
    /// not start at row 0, the line break before it is removed; otherwise the one after it
    /// is. Removing every line leaves a single empty line.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidRange`] if `first_row > last_row` after clamping.
    pub fn remove_full_lines(&mut self, first_row: usize, last_row: usize) -> Result<Vec<String>> {
        let final_row = self.get_length() - 1;
        let first = first_row.min(final_row);
        let last = last_row.min(final_row);
        if first > last {
            return Err(DocumentError::InvalidRange(Range::new(first, 0, last, 0)));
        }

        let delete_leading_break = last == final_row && first > 0;
        let delete_trailing_break = last < final_row;

        let start = if delete_leading_break {
            Position::new(first - 1, self.store.line_len(first - 1).unwrap_or(0))
        } else {
            Position::new(first, 0)
        };
        let end = if delete_trailing_break {
            Position::new(last + 1, 0)
        } else {
            Position::new(last, self.store.line_len(last).unwrap_or(0))
        };

        let removed = self.get_lines(first, last);
        if start != end {
            let delta = Delta::remove(start, end, self.slice_lines(start, end));
            self.commit(&delta);
        }
        Ok(removed)
    }

    /// Join row `row + 1` onto row `row`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::OutOfBounds`] if `row` is the last row.
    pub fn remove_new_line(&mut self, row: usize) -> Result<()> {
        if row >= self.get_length() - 1 {
            return Err(DocumentError::OutOfBounds(Position::new(row, 0)));
        }
        let len = self.store.line_len(row).unwrap_or(0);
        self.remove(Range::new(row, len, row + 1, 0))?;
        Ok(())
    }

    /// Replace the content of `range` with `text`.
    ///
    /// Implemented as a removal followed by an insertion at `range.start`. Replacing text
    /// with identical text changes nothing.
    pub fn replace(&mut self, range: Range, text: &str) -> Result<Range> {
        self.check_range(range)?;
        if range.is_empty() {
            return self.insert(range.start, text);
        }
        if self.store.slice(range.start, range.end) == line_ending::normalize(text) {
            return Ok(range);
        }
        self.remove(range)?;
        self.insert(range.start, text)
    }

    /// Replace the whole content.
    pub fn set_value(&mut self, text: &str) {
        let last = self.get_length() - 1;
        let end = Position::new(last, self.store.line_len(last).unwrap_or(0));
        let start = Position::new(0, 0);
        if start != end {
            let delta = Delta::remove(start, end, self.slice_lines(start, end));
            self.commit(&delta);
        }
        self.detect_new_line(text);
        if !text.is_empty() {
            let delta = Delta::insert(start, line_ending::split_lines(text));
            self.commit(&delta);
        }
    }

    // ----------------------------------------------------------------------------------
    // Delta replay
    // ----------------------------------------------------------------------------------

    /// Apply a recorded delta.
    ///
    /// The delta is validated against current content first: its lines must be
    /// terminator-free, its end must match its lines, and a removal must match the text it
    /// removes.
    ///
    /// # Errors
    ///
    /// [`DocumentError::OutOfBounds`] or [`DocumentError::DeltaMismatch`]; the document is
    /// unchanged in both cases.
    pub fn apply_delta(&mut self, delta: &Delta) -> Result<()> {
        if let Err(err) = self.validate_delta(delta) {
            log::warn!("{}: rejected {:?} delta at {}: {err}", self.id, delta.action, delta.start);
            return Err(err);
        }
        if !delta.is_empty() {
            self.commit(delta);
        }
        Ok(())
    }

    /// Undo a delta previously applied to this document.
    pub fn revert_delta(&mut self, delta: &Delta) -> Result<()> {
        self.apply_delta(&delta.invert())
    }

    /// Apply deltas in order, stopping at the first one that fails.
    pub fn apply_deltas(&mut self, deltas: &[Delta]) -> Result<()> {
        deltas.iter().try_for_each(|delta| self.apply_delta(delta))
    }

    /// Revert deltas in reverse order, stopping at the first one that fails.
    pub fn revert_deltas(&mut self, deltas: &[Delta]) -> Result<()> {
        deltas
            .iter()
            .rev()
            .try_for_each(|delta| self.revert_delta(delta))
    }

    fn validate_delta(&self, delta: &Delta) -> Result<()> {
        if delta.lines.is_empty() {
            return Err(DocumentError::DeltaMismatch("delta has no lines"));
        }
        if delta
            .lines
            .iter()
            .any(|line| line_ending::contains_line_break(line))
        {
            return Err(DocumentError::DeltaMismatch("delta line contains a line break"));
        }
        self.check_position(delta.start)?;
        if end_of_lines(delta.start, &delta.lines) != delta.end {
            return Err(DocumentError::DeltaMismatch("delta end does not match its lines"));
        }
        if delta.action == DeltaAction::Remove {
            self.check_position(delta.end)?;
            if self.store.slice(delta.start, delta.end) != delta.text() {
                return Err(DocumentError::DeltaMismatch(
                    "removed lines differ from document content",
                ));
            }
        }
        Ok(())
    }

    /// Apply a validated delta to storage, then notify anchors and listeners.
    fn commit(&mut self, delta: &Delta) {
        match delta.action {
            DeltaAction::Insert => self.store.insert(delta.start, &delta.text()),
            DeltaAction::Remove => self.store.remove(delta.start, delta.end),
        }
        log::trace!(
            "{}: {:?} {}..{} ({} lines)",
            self.id,
            delta.kind(),
            delta.start,
            delta.end,
            delta.lines.len()
        );
        self.anchors.dispatch(delta);
        for listener in &mut self.listeners {
            listener(delta);
        }
    }

    /// Subscribe to document changes. Listeners run after all anchors were updated.
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: FnMut(&Delta) + Send + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    // ----------------------------------------------------------------------------------
    // Anchors
    // ----------------------------------------------------------------------------------

    /// Register an anchor at `(row, column)`, clipped into the document.
    pub fn create_anchor(&mut self, row: usize, column: usize) -> AnchorId {
        self.create_anchor_with_bias(Position::new(row, column), false)
    }

    /// Register an anchor with an explicit `insert_right` tie-break flag.
    pub fn create_anchor_with_bias(&mut self, position: Position, insert_right: bool) -> AnchorId {
        let clipped = self.clip_position(position);
        let id = self.anchors.create(clipped, insert_right);
        log::debug!(
            "{id} created at {clipped} (requested {position}, insert_right {insert_right})"
        );
        id
    }

    /// Look up an attached anchor.
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    /// Current position of an attached anchor.
    pub fn anchor_position(&self, id: AnchorId) -> Result<Position> {
        self.anchors
            .get(id)
            .map(Anchor::position)
            .ok_or(DocumentError::UnknownAnchor(id))
    }

    /// All attached anchors, in registration order.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    /// Number of attached anchors.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Change an anchor's tie-break flag.
    pub fn set_anchor_insert_right(&mut self, id: AnchorId, insert_right: bool) -> Result<()> {
        if self.anchors.set_insert_right(id, insert_right) {
            Ok(())
        } else {
            Err(DocumentError::UnknownAnchor(id))
        }
    }

    /// Move an anchor explicitly. The position is clipped into the document and listeners
    /// fire if it changed. Returns the clipped position.
    pub fn set_anchor_position(&mut self, id: AnchorId, position: Position) -> Result<Position> {
        let clipped = self.clip_position(position);
        match self.anchors.move_to(id, clipped) {
            Some(_) => Ok(clipped),
            None => Err(DocumentError::UnknownAnchor(id)),
        }
    }

    /// Subscribe to an anchor's change notifications.
    pub fn on_anchor_change<F>(&mut self, id: AnchorId, callback: F) -> Result<()>
    where
        F: FnMut(&AnchorChange) + Send + 'static,
    {
        if self.anchors.subscribe(id, Box::new(callback)) {
            Ok(())
        } else {
            Err(DocumentError::UnknownAnchor(id))
        }
    }

    /// Detach an anchor and return its final position.
    ///
    /// The anchor stops receiving edits and its listeners are dropped. Later calls with the
    /// same handle fail with [`DocumentError::UnknownAnchor`].
    pub fn detach_anchor(&mut self, id: AnchorId) -> Result<Position> {
        let anchor = self
            .anchors
            .remove(id)
            .ok_or(DocumentError::UnknownAnchor(id))?;
        log::debug!("{id} detached at {}", anchor.position());
        Ok(anchor.position())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("lines", &self.get_length())
            .field("new_line_mode", &self.new_line_mode)
            .field("anchors", &self.anchors.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
