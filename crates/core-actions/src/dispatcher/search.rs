//! Search dispatch: submitting `/` or `?` and repeating with `n` / `N`.
//!
//! A hit moves the primary cursor like any other motion; nothing enters the
//! history.

use super::DispatchResult;
use crate::search::{SearchPattern, find};
use core_state::{EditorState, SearchRequest};

/// Run a submitted search. An empty pattern reuses the previous one in the
/// newly requested direction.
pub(crate) fn submit(pattern: String, forward: bool, state: &mut EditorState) -> DispatchResult {
    let pattern = if pattern.is_empty() {
        match &state.last_search {
            Some(last) => last.pattern.clone(),
            None => {
                state.set_status("no previous pattern");
                return DispatchResult::dirty();
            }
        }
    } else {
        pattern
    };
    state.last_search = Some(SearchRequest {
        pattern: pattern.clone(),
        forward,
    });
    run(&pattern, forward, state)
}

pub(crate) fn handle_search_next(reverse: bool, state: &mut EditorState) -> DispatchResult {
    let Some(last) = state.last_search.clone() else {
        state.set_status("no previous pattern");
        return DispatchResult::dirty();
    };
    run(&last.pattern, last.forward != reverse, state)
}

fn run(pattern: &str, forward: bool, state: &mut EditorState) -> DispatchResult {
    state.buffer.end_insert_run();
    let Some(compiled) = SearchPattern::new(pattern) else {
        state.set_status("no previous pattern");
        return DispatchResult::dirty();
    };
    let from = state.buffer.cursor().pos();
    let hit = {
        let doc = state.buffer.document().borrow();
        find(&doc, &compiled, from, forward)
    };
    match hit {
        Some(hit) => {
            state.buffer.cursor_mut().to_pos(hit.pos);
            if hit.wrapped {
                state.set_status(if forward {
                    "search hit BOTTOM, continuing at TOP"
                } else {
                    "search hit TOP, continuing at BOTTOM"
                });
            }
            tracing::trace!(target: "actions.dispatch", op = "search", forward, wrapped = hit.wrapped, to = %hit.pos, "search_hit");
            DispatchResult::dirty()
        }
        None => {
            tracing::debug!(target: "actions.dispatch", op = "search", forward, "search_miss");
            state.set_status(format!("pattern not found: {pattern}"));
            DispatchResult::dirty()
        }
    }
}
