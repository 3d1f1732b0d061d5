//! Text edit action handling.
//!
//! Every edit runs as a history command on the buffer. Typed text and Tab
//! go through `Buffer::insert_text`, which grows the open insert run; every
//! other edit ends the run. A refused command leaves the document, the
//! cursor and the history untouched.

use super::DispatchResult;
use crate::EditKind;
use core_config::EditSettings;
use core_state::{
    BreakLine, CommandResult, DeleteSingleChar, DeleteSingleCharAfter, EditorMode, EditorState,
    JoinWithNextLine, NewLine, NewLineAfter,
};

pub(crate) fn handle_edit(
    kind: EditKind,
    state: &mut EditorState,
    settings: &EditSettings,
) -> DispatchResult {
    let op = edit_name(&kind);
    let mode_before = state.mode();
    let result = match kind {
        EditKind::InsertText(text) => state.buffer.insert_text(&text),
        EditKind::InsertTab => state.buffer.insert_text(&settings.tab_text()),
        EditKind::BreakLine => state.buffer.execute(BreakLine::new()),
        EditKind::DeleteCharBefore => state.buffer.execute(DeleteSingleChar::new()),
        EditKind::DeleteCharUnder => state.buffer.execute(DeleteSingleCharAfter::new()),
        EditKind::JoinLines => state.buffer.execute(JoinWithNextLine::new()),
        EditKind::OpenLineBelow => {
            let result = state.buffer.execute(NewLineAfter::new(settings.auto_indent));
            state.set_mode(EditorMode::Insert);
            result
        }
        EditKind::OpenLineAbove => {
            let result = state.buffer.execute(NewLine::new(settings.auto_indent));
            state.set_mode(EditorMode::Insert);
            result
        }
    };
    let mut dispatched = report(op, &result, state);
    if state.mode() != mode_before {
        dispatched.dirty = true;
    }
    dispatched
}

fn edit_name(kind: &EditKind) -> &'static str {
    match kind {
        EditKind::InsertText(_) => "insert_text",
        EditKind::InsertTab => "insert_tab",
        EditKind::BreakLine => "break_line",
        EditKind::DeleteCharBefore => "delete_char_before",
        EditKind::DeleteCharUnder => "delete_char_under",
        EditKind::JoinLines => "join_lines",
        EditKind::OpenLineBelow => "open_line_below",
        EditKind::OpenLineAbove => "open_line_above",
    }
}

fn report(op: &'static str, result: &CommandResult, state: &EditorState) -> DispatchResult {
    let pos = state.buffer.cursor().pos();
    if result.success {
        tracing::trace!(target: "actions.dispatch", op, line = pos.line, column = pos.column, "edit");
        DispatchResult::dirty()
    } else {
        tracing::debug!(target: "actions.dispatch", op, info = ?result.info, "edit_refused");
        DispatchResult::clean()
    }
}
