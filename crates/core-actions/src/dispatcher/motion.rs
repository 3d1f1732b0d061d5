//! Motion sub-dispatch (cursor movement).
//!
//! Pure navigation on the primary cursor: no command is created and the
//! history is untouched. Any motion ends the open insert run, so typing
//! after moving starts a new undo step. The mode is left alone, which means
//! a directional key inside an armed chord keeps the chord armed.

use super::DispatchResult;
use crate::MotionKind;
use core_config::EditSettings;
use core_state::EditorState;
use core_text::Cursor;

pub(crate) fn handle_motion(
    kind: MotionKind,
    state: &mut EditorState,
    settings: &EditSettings,
) -> DispatchResult {
    state.buffer.end_insert_run();
    let cursor = state.buffer.cursor_mut();
    let before = cursor.pos();
    let moved = match kind {
        MotionKind::Up => cursor.to_line_prev(),
        MotionKind::Down => cursor.to_line_next(),
        MotionKind::Left => cursor.to_char_prev(),
        MotionKind::Right => cursor.to_char_next(),
        MotionKind::LineStart => cursor.to_line_beginning(),
        MotionKind::LineEnd => cursor.to_line_end(),
        MotionKind::PageUp => repeat(cursor, settings.page_lines, Cursor::to_line_prev),
        MotionKind::PageDown => repeat(cursor, settings.page_lines, Cursor::to_line_next),
        MotionKind::FirstLine => cursor.to_first_line(),
        MotionKind::LastLine => cursor.to_last_line(),
    };
    let after = cursor.pos();
    tracing::trace!(target: "actions.dispatch", op = "motion", ?kind, moved, from = %before, to = %after, "motion");
    DispatchResult::from_change(moved && before != after)
}

/// Apply a one-line step up to `times` times, stopping at the document
/// edge. True if any step moved.
fn repeat(cursor: &mut Cursor, times: usize, step: fn(&mut Cursor) -> bool) -> bool {
    let mut moved = false;
    for _ in 0..times {
        if !step(cursor) {
            break;
        }
        moved = true;
    }
    moved
}
