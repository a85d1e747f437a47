//! Randomized anchor properties
//!
//! Validation criteria:
//! 1. Every live anchor stays a valid position after any edit sequence.
//! 2. Anchors strictly before an edit never move; anchors after it shift so that they keep
//!    pointing at the same character, checked against an independent offset model.
//! 3. Insert-then-remove of the same span restores anchors outside the span.
//! 4. A change notification fires if and only if the position changed.

use line_document::{AnchorId, Document, Position, Range};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

const SAMPLES: &[&str] = &["x", "你好", "ab\ncd", "\n", "line\r\n", "👋\n\n"];

fn random_position(rng: &mut StdRng, doc: &Document) -> Position {
    let row = rng.gen_range(0..doc.get_length());
    let len = doc.line_len(row).unwrap();
    Position::new(row, rng.gen_range(0..=len))
}

fn random_range(rng: &mut StdRng, doc: &Document) -> Range {
    Range::from_points(random_position(rng, doc), random_position(rng, doc))
}

/// Character offset of `position` in the LF-normalized text, computed from the text alone.
fn offset_of(text: &str, position: Position) -> usize {
    let mut offset = 0;
    for (row, line) in text.split('\n').enumerate() {
        if row == position.row {
            return offset + position.column;
        }
        offset += line.chars().count() + 1;
    }
    panic!("row {} outside text", position.row);
}

#[test]
fn test_anchors_stay_valid_under_random_edits() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut doc = Document::new("juhu\nkinners\n123\n\nlast line");
    let anchors: Vec<AnchorId> = (0..24)
        .map(|i| {
            let position = random_position(&mut rng, &doc);
            doc.create_anchor_with_bias(position, i % 2 == 0)
        })
        .collect();

    for _ in 0..400 {
        match rng.gen_range(0..6) {
            0 | 1 => {
                let at = random_position(&mut rng, &doc);
                let text = SAMPLES[rng.gen_range(0..SAMPLES.len())];
                doc.insert(at, text).unwrap();
            }
            2 => {
                let range = random_range(&mut rng, &doc);
                doc.remove(range).unwrap();
            }
            3 => {
                let row = rng.gen_range(0..=doc.get_length());
                doc.insert_full_lines(row, &["full", "lines"]);
            }
            4 => {
                let first = rng.gen_range(0..doc.get_length());
                let last = rng.gen_range(first..doc.get_length());
                doc.remove_full_lines(first, last).unwrap();
            }
            _ => {
                let at = random_position(&mut rng, &doc);
                doc.insert_merged_lines(at, &["", ""]).unwrap();
            }
        }

        for &anchor in &anchors {
            let position = doc.anchor_position(anchor).unwrap();
            assert!(
                doc.is_valid_position(position),
                "anchor {anchor} at {position} is outside the document"
            );
        }
    }
}

#[test]
fn test_anchors_follow_their_character_on_insert() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut doc = Document::new("alpha\nbeta\ngamma\ndelta");

    for _ in 0..200 {
        let anchor_pos = random_position(&mut rng, &doc);
        let anchor = doc.create_anchor(anchor_pos.row, anchor_pos.column);
        let before_text = doc.text();
        let anchor_offset = offset_of(&before_text, anchor_pos);

        let at = random_position(&mut rng, &doc);
        let text = SAMPLES[rng.gen_range(0..SAMPLES.len())];
        let inserted = doc.insert(at, text).unwrap();
        let text_after = doc.text();
        let inserted_len =
            offset_of(&text_after, inserted.end) - offset_of(&text_after, inserted.start);

        let after = doc.anchor_position(anchor).unwrap();
        if anchor_pos < at {
            assert_eq!(after, anchor_pos);
        } else {
            // At or after the insertion point: the anchor keeps its character, shifted by
            // the inserted length.
            assert_eq!(offset_of(&text_after, after), anchor_offset + inserted_len);
        }
        doc.detach_anchor(anchor).unwrap();
    }
}

#[test]
fn test_anchors_follow_their_character_on_remove() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut doc = Document::new(&"0123456789\n".repeat(20));

    for _ in 0..60 {
        let anchor_pos = random_position(&mut rng, &doc);
        let anchor = doc.create_anchor(anchor_pos.row, anchor_pos.column);
        let before_text = doc.text();
        let anchor_offset = offset_of(&before_text, anchor_pos);

        let range = random_range(&mut rng, &doc);
        let start = offset_of(&before_text, range.start);
        let end = offset_of(&before_text, range.end);
        doc.remove(range).unwrap();

        let after = doc.anchor_position(anchor).unwrap();
        let after_offset = offset_of(&doc.text(), after);
        if anchor_offset <= start {
            assert_eq!(after, anchor_pos);
        } else if anchor_offset >= end {
            assert_eq!(after_offset, anchor_offset - (end - start));
        } else {
            assert_eq!(after, range.start);
        }
        doc.detach_anchor(anchor).unwrap();
    }
}

#[test]
fn test_insert_then_remove_restores_outside_anchors() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut doc = Document::new("juhu\nkinners\n123");
    let anchors: Vec<AnchorId> = (0..12)
        .map(|_| {
            let position = random_position(&mut rng, &doc);
            doc.create_anchor_with_bias(position, rng.gen_bool(0.5))
        })
        .collect();

    for _ in 0..100 {
        let before: Vec<Position> = anchors
            .iter()
            .map(|&anchor| doc.anchor_position(anchor).unwrap())
            .collect();
        let text_before = doc.text();

        let at = random_position(&mut rng, &doc);
        let text = SAMPLES[rng.gen_range(0..SAMPLES.len())];
        let inserted = doc.insert(at, text).unwrap();
        doc.remove(inserted).unwrap();

        assert_eq!(doc.text(), text_before);
        for (&anchor, &old) in anchors.iter().zip(&before) {
            let now = doc.anchor_position(anchor).unwrap();
            if old != at {
                assert_eq!(now, old, "anchor {anchor} outside the span moved");
            } else {
                // Anchors exactly at the insertion point are carried into the span or kept
                // at its start; removing the span returns both to the start.
                assert_eq!(now, at);
            }
        }
    }
}

#[test]
fn test_change_events_fire_iff_position_changes() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut doc = Document::new("one\ntwo\nthree\nfour");
    let anchor = doc.create_anchor(2, 2);
    let events = Arc::new(Mutex::new(0usize));
    let events_cb = events.clone();
    doc.on_anchor_change(anchor, move |change| {
        assert_ne!(change.old, change.value);
        *events_cb.lock().unwrap() += 1;
    })
    .unwrap();

    for _ in 0..200 {
        let before = doc.anchor_position(anchor).unwrap();
        let events_before = *events.lock().unwrap();

        if rng.gen_bool(0.5) {
            let at = random_position(&mut rng, &doc);
            doc.insert(at, SAMPLES[rng.gen_range(0..SAMPLES.len())]).unwrap();
        } else {
            let range = random_range(&mut rng, &doc);
            doc.remove(range).unwrap();
        }

        let moved = doc.anchor_position(anchor).unwrap() != before;
        let fired = *events.lock().unwrap() - events_before;
        assert_eq!(fired, usize::from(moved));
    }
}
