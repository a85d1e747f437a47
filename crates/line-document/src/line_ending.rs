//! Line ending helpers.
//!
//! A [`Document`](crate::Document) stores text internally using LF (`'\n'`) newlines.
//! CR, LF and CRLF in incoming text are all treated as one line break. The style found in
//! the source text (or chosen through [`NewLineMode`]) is re-applied when the document is
//! serialized with [`Document::get_value`](crate::Document::get_value).

use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));

/// A concrete newline sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
    /// Classic Mac CR (`'\r'`).
    Cr,
}

impl LineEnding {
    /// Detect the line ending from the first line break in `text`.
    ///
    /// Returns `None` when `text` has no line break at all.
    pub fn detect_in_text(text: &str) -> Option<Self> {
        LINE_BREAK.find(text).map(|m| match m.as_str() {
            "\r\n" => Self::Crlf,
            "\r" => Self::Cr,
            _ => Self::Lf,
        })
    }

    /// The newline sequence as a string slice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Convert an LF-normalized text to this line ending.
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            other => text.replace('\n', other.as_str()),
        }
    }
}

/// How a document picks the newline sequence used for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NewLineMode {
    /// Use the style detected from the loaded text; LF when nothing was detected.
    #[default]
    Auto,
    /// Always LF.
    Unix,
    /// Always CRLF.
    Windows,
}

/// Split `text` on any line terminator (CR, LF or CRLF).
///
/// N terminators yield N + 1 lines, so a trailing terminator produces a trailing empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    LINE_BREAK.split(text).map(str::to_string).collect()
}

/// Replace every terminator in `text` with LF.
pub fn normalize(text: &str) -> String {
    LINE_BREAK.replace_all(text, "\n").into_owned()
}

/// `true` when `text` is exactly one line terminator.
pub fn is_new_line(text: &str) -> bool {
    matches!(text, "\r\n" | "\r" | "\n")
}

/// `true` when `text` contains a line terminator.
pub fn contains_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_uses_first_break() {
        assert_eq!(LineEnding::detect_in_text("a\r\nb\nc"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::detect_in_text("a\nb\r\nc"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::detect_in_text("a\rb"), Some(LineEnding::Cr));
        assert_eq!(LineEnding::detect_in_text("abc"), None);
    }

    #[test]
    fn test_split_mixed_terminators() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines(""), vec![""]);
        // CR followed by LF is one break, LF followed by CR is two.
        assert_eq!(split_lines("a\n\rb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_normalize_and_apply() {
        let normalized = normalize("x\r\ny\rz");
        assert_eq!(normalized, "x\ny\nz");
        assert_eq!(LineEnding::Crlf.apply_to_text(&normalized), "x\r\ny\r\nz");
        assert_eq!(LineEnding::Cr.apply_to_text("x\ny"), "x\ry");
    }

    #[test]
    fn test_is_new_line() {
        assert!(is_new_line("\r\n"));
        assert!(is_new_line("\n"));
        assert!(!is_new_line("\n\n"));
        assert!(contains_line_break("ab\rc"));
        assert!(!contains_line_break("abc"));
    }
}
