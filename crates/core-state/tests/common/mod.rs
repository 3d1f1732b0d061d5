#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_state::Buffer;
use core_text::{Line, Position, TextDocument};
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Buffer loaded from a fixture file.
pub fn fixture_buffer(name: &str) -> Buffer {
    let text = std::fs::read_to_string(fixture_path(name)).expect("fixture readable");
    Buffer::new(TextDocument::from_text(&text))
}

pub fn buffer_from(text: &str) -> Buffer {
    Buffer::new(TextDocument::from_text(text))
}

pub fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column)
}

pub fn text(buffer: &Buffer) -> String {
    buffer.document().borrow().document_text()
}

/// Every line with its annotations, for exact comparisons.
pub fn lines(buffer: &Buffer) -> Vec<Line> {
    let doc = buffer.document().borrow();
    (1..=doc.num_lines())
        .map(|n| doc.line_snapshot(n).expect("line in range"))
        .collect()
}

pub fn change_tag(buffer: &Buffer, line: usize) -> Option<core_text::ChangeKind> {
    buffer.document().borrow().line(line).ok()?.change()
}
