#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, Dispatcher, EditSettings, parse_key_script};
use core_events::KeyEvent;
use core_state::{Buffer, EditorState};
use core_text::{Position, TextDocument};
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Editing session over a fixture file, cursor at (1, 1) in COMMAND mode.
pub fn fixture_session(name: &str) -> EditorState {
    let doc = TextDocument::open(fixture_path(name)).expect("fixture readable");
    EditorState::new(Buffer::new(doc))
}

pub fn session(text: &str) -> EditorState {
    EditorState::new(Buffer::new(TextDocument::from_text(text)))
}

/// Replay a key script with default settings. Returns true if it quit.
pub fn replay(state: &mut EditorState, script: &str) -> bool {
    replay_with(state, script, EditSettings::default())
}

pub fn replay_with(state: &mut EditorState, script: &str, settings: EditSettings) -> bool {
    let keys = parse_key_script(script).expect("valid key script");
    Dispatcher::new(settings).handle_keys(state, &keys)
}

pub fn press(state: &mut EditorState, key: KeyEvent) -> DispatchResult {
    Dispatcher::default().handle_key(state, &key)
}

pub fn text(state: &EditorState) -> String {
    state.buffer.document().borrow().document_text()
}

pub fn line_text(state: &EditorState, n: usize) -> String {
    state
        .buffer
        .document()
        .borrow()
        .line_text(n)
        .expect("line in range")
        .to_string()
}

pub fn num_lines(state: &EditorState) -> usize {
    state.buffer.document().borrow().num_lines()
}

pub fn cursor(state: &EditorState) -> Position {
    state.buffer.cursor().pos()
}

pub fn pos(line: usize, column: usize) -> Position {
    Position::new(line, column)
}
