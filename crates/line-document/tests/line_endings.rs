use line_document::{Document, LineEnding, NewLineMode, Position, Range};

#[test]
fn test_crlf_is_normalized_on_load_and_preserved_for_saving() {
    let doc = Document::new("a\r\nb\r\n");

    // Internal storage is LF-only.
    assert_eq!(doc.text(), "a\nb\n");
    assert_eq!(doc.get_all_lines(), vec!["a", "b", ""]);

    // Preferred line ending is detected from the loaded text.
    assert_eq!(doc.line_ending(), LineEnding::Crlf);

    // Serialization round-trips to CRLF.
    assert_eq!(doc.get_value(), "a\r\nb\r\n");
}

#[test]
fn test_insert_normalizes_crlf_to_lf() {
    let mut doc = Document::new("x\ny");
    doc.insert(Position::new(1, 1), "a\r\nb").unwrap();

    assert_eq!(doc.text(), "x\nya\nb");
    assert_eq!(doc.line_ending(), LineEnding::Lf);
    assert_eq!(doc.get_value(), "x\nya\nb");
}

#[test]
fn test_insert_into_single_line_document_redetects() {
    let mut doc = Document::new("");
    doc.insert(Position::new(0, 0), "a\r\nb").unwrap();

    assert_eq!(doc.text(), "a\nb");
    assert_eq!(doc.line_ending(), LineEnding::Crlf);
    assert_eq!(doc.get_value(), "a\r\nb");
}

#[test]
fn test_clearing_the_document_resets_detection() {
    let mut doc = Document::new("a\r\nb");
    doc.set_value("");
    assert_eq!(doc.line_ending(), LineEnding::Lf);

    let mut doc = Document::new("a\r");
    doc.remove(Range::new(0, 1, 1, 0)).unwrap();
    assert_eq!(doc.line_ending(), LineEnding::Cr);
    doc.insert(Position::new(0, 1), "").unwrap();
    assert_eq!(doc.line_ending(), LineEnding::Lf);
    assert_eq!(doc.get_value(), "a");
}

#[test]
fn test_cr_is_normalized_to_lf() {
    // Treat lone `\r` as a line break on load, normalizing to internal LF storage.
    let doc = Document::new("a\rb");
    assert_eq!(doc.text(), "a\nb");
    assert_eq!(doc.get_line(0).as_deref(), Some("a"));
    assert_eq!(doc.get_line(1).as_deref(), Some("b"));
    assert_eq!(doc.get_value(), "a\rb");
}

#[test]
fn test_explicit_mode_overrides_detection() {
    let mut doc = Document::new("a\r\nb");
    doc.set_new_line_mode(NewLineMode::Unix);
    assert_eq!(doc.new_line_character(), "\n");
    assert_eq!(doc.get_value(), "a\nb");

    doc.set_new_line_mode(NewLineMode::Auto);
    assert_eq!(doc.get_value(), "a\r\nb");
}

#[test]
fn test_removed_text_uses_document_line_ending() {
    let mut doc = Document::new("juhu\r\nkinners");
    let removed = doc.remove(Range::new(0, 2, 1, 3)).unwrap();
    assert_eq!(removed, "hu\r\nkin");
    assert_eq!(doc.get_value(), "juners");
}
