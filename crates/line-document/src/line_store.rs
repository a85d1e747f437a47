//! Rope-backed line storage.
//!
//! Holds LF-normalized text in a [`ropey::Rope`], giving O(log N) line access and editing.
//! Ropey is built without its `unicode_lines`/`cr_lines` features, so `'\n'` is the only
//! line break it recognizes; everything else is ordinary line content.
//!
//! The store does no validation. [`Document`](crate::Document) checks every position
//! before calling into it.

use crate::position::Position;
use ropey::Rope;

/// Line storage for a document.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineStore {
    rope: Rope,
}

impl LineStore {
    /// Build from LF-normalized text.
    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. An empty store has one line; a trailing `'\n'` adds an empty line.
    pub(crate) fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count, line breaks included.
    pub(crate) fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Text of a line, without its line break.
    pub(crate) fn line(&self, row: usize) -> Option<String> {
        if row >= self.line_count() {
            return None;
        }
        let mut text = self.rope.line(row).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Length of a line in characters, without its line break.
    pub(crate) fn line_len(&self, row: usize) -> Option<usize> {
        if row >= self.line_count() {
            return None;
        }
        let line = self.rope.line(row);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            Some(len - 1)
        } else {
            Some(len)
        }
    }

    /// Character offset of a (valid) position.
    pub(crate) fn position_to_char(&self, position: Position) -> usize {
        self.rope.line_to_char(position.row) + position.column
    }

    /// Position of a character offset, clamped to the end of the text.
    pub(crate) fn char_to_position(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());
        let row = self.rope.char_to_line(char_offset);
        Position::new(row, char_offset - self.rope.line_to_char(row))
    }

    /// Insert LF-normalized text at a (valid) position.
    pub(crate) fn insert(&mut self, position: Position, text: &str) {
        let at = self.position_to_char(position);
        self.rope.insert(at, text);
    }

    /// Remove `[start, end)`.
    pub(crate) fn remove(&mut self, start: Position, end: Position) {
        let from = self.position_to_char(start);
        let to = self.position_to_char(end);
        if from < to {
            self.rope.remove(from..to);
        }
    }

    /// Text of `[start, end)`.
    pub(crate) fn slice(&self, start: Position, end: Position) -> String {
        let from = self.position_to_char(start);
        let to = self.position_to_char(end);
        self.rope.slice(from..to).to_string()
    }

    /// Complete text.
    pub(crate) fn text(&self) -> String {
        self.rope.to_string()
    }
}
