#![cfg(feature = "serde")]

use line_document::{Delta, DeltaAction, Document, Position};
use std::sync::{Arc, Mutex};

#[test]
fn test_recorded_deltas_replay_from_json() {
    let mut doc = Document::new("juhu\nkinners");
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    doc.on_change(move |delta| sink.lock().unwrap().push(delta.clone()));

    doc.insert(Position::new(1, 3), "\nab").unwrap();
    doc.remove_new_line(0).unwrap();

    let json = serde_json::to_string(&*recorded.lock().unwrap()).unwrap();
    let deltas: Vec<Delta> = serde_json::from_str(&json).unwrap();
    assert_eq!(deltas[0].action, DeltaAction::Insert);

    let mut replica = Document::new("juhu\nkinners");
    replica.apply_deltas(&deltas).unwrap();
    assert_eq!(replica.text(), doc.text());
}
