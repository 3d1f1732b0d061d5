//! Mode transitions and the two-key chords.
//!
//! `d` and `g` only arm `DELETE` / `GO`; the confirming second key runs the
//! paired operation and returns to `COMMAND`. Escape disarms without effect.

use super::DispatchResult;
use crate::ModeChange;
use core_state::{DeleteLineAtCursor, EditorMode, EditorState};

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    match mc {
        ModeChange::EnterInsert => enter_insert(state),
        ModeChange::EnterInsertAfter => {
            state.buffer.cursor_mut().to_char_next();
            enter_insert(state)
        }
        ModeChange::EnterInsertLineStart => {
            state.buffer.cursor_mut().to_line_beginning();
            enter_insert(state)
        }
        ModeChange::EnterInsertLineEnd => {
            state.buffer.cursor_mut().to_line_end();
            enter_insert(state)
        }
        ModeChange::ArmDelete => {
            state.set_mode(EditorMode::Delete);
            DispatchResult::dirty()
        }
        ModeChange::ArmGo => {
            state.set_mode(EditorMode::Go);
            DispatchResult::dirty()
        }
        ModeChange::ConfirmDelete => {
            let result = state.buffer.execute(DeleteLineAtCursor::new());
            if !result.success {
                tracing::debug!(target: "actions.dispatch", op = "dd", info = ?result.info, "refused");
            }
            state.set_mode(EditorMode::Command);
            DispatchResult::dirty()
        }
        ModeChange::ConfirmGo => {
            state.buffer.cursor_mut().to_first_line();
            state.set_mode(EditorMode::Command);
            DispatchResult::dirty()
        }
        ModeChange::Cancel => {
            let changed = state.mode() != EditorMode::Command;
            state.set_mode(EditorMode::Command);
            DispatchResult::from_change(changed)
        }
    }
}

fn enter_insert(state: &mut EditorState) -> DispatchResult {
    state.set_mode(EditorMode::Insert);
    DispatchResult::dirty()
}
