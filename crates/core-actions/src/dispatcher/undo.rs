//! Undo dispatch.
//!
//! Pops the newest history command and reverts it. There is no redo: an
//! undone command is dropped.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    let before = state.buffer.document().borrow().num_lines();
    if state.buffer.undo() {
        let after = state.buffer.document().borrow().num_lines();
        tracing::trace!(target: "actions.dispatch", op = "undo", lines_changed = (before != after), remaining = state.buffer.history().len(), "undo");
        DispatchResult::dirty()
    } else {
        state.set_status("already at oldest change");
        DispatchResult::dirty()
    }
}
