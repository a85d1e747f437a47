//! Anchor tracking example
//!
//! Demonstrates how anchors follow edits and report their moves.

use line_document::{Document, Position, Range};
use std::sync::{Arc, Mutex};

fn main() {
    println!("=== Anchor tracking example ===\n");

    let mut doc = Document::new("juhu\nkinners\n123");

    println!("1. Initial document:");
    print_document(&doc);

    // A cursor-like anchor and a marker that keeps its place when text is typed at it.
    let cursor = doc.create_anchor(1, 4);
    let marker = doc.create_anchor_with_bias(Position::new(1, 4), true);

    let moves = Arc::new(Mutex::new(0));
    let moves_clone = moves.clone();
    doc.on_anchor_change(cursor, move |change| {
        let mut count = moves_clone.lock().unwrap();
        *count += 1;
        println!("  cursor move #{}: {} -> {}", count, change.old, change.value);
    })
    .unwrap();

    println!("\n2. Typing at the anchors:");
    doc.insert(Position::new(1, 4), "123").unwrap();
    print_anchor(&doc, "cursor", cursor);
    print_anchor(&doc, "marker", marker);

    println!("\n3. Inserting full lines above:");
    doc.insert_full_lines(0, &["header"]);
    print_anchor(&doc, "cursor", cursor);

    println!("\n4. Removing a span that contains the cursor:");
    doc.remove(Range::new(1, 2, 2, 8)).unwrap();
    print_anchor(&doc, "cursor", cursor);
    print_anchor(&doc, "marker", marker);

    println!("\n5. Final document:");
    print_document(&doc);
    println!("  cursor moved {} times", moves.lock().unwrap());

    let last = doc.detach_anchor(cursor).unwrap();
    println!("  cursor detached at {}", last);
}

fn print_document(doc: &Document) {
    for (row, line) in doc.get_all_lines().iter().enumerate() {
        println!("  {:>3} | {}", row, line);
    }
}

fn print_anchor(doc: &Document, name: &str, id: line_document::AnchorId) {
    if let Some(anchor) = doc.anchor(id) {
        println!(
            "  {} at row {}, column {} (insert_right: {})",
            name,
            anchor.row(),
            anchor.column(),
            anchor.insert_right()
        );
    }
}
