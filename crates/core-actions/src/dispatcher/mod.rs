//! Dispatcher applying `Action` to mutable editor state.
//!
//! Sub-modules by concern:
//! * `motion`  - cursor movement (never recorded in the history)
//! * `mode`    - mode transitions and the `dd` / `gg` chords
//! * `edit`    - text mutation through history commands
//! * `undo`    - pop and revert the newest command
//! * `command` - command line editing and `:` command execution
//! * `search`  - `/`, `?`, `n` and `N`
//!
//! Every action completes synchronously; document and cursor notifications
//! fired by it are delivered before `dispatch` returns.

use crate::{Action, key_translator};
use core_config::EditSettings;
use core_events::KeyEvent;
use core_state::EditorState;

mod command;
mod command_parser;
mod edit;
mod mode;
mod motion;
mod search;
mod undo;

pub use command_parser::{CommandParser, ParsedCommand};

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Document, cursor, mode or status changed.
    pub dirty: bool,
    /// The session asked to end.
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }

    fn from_change(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an action to editor state.
///
/// The status message of the previous action is cleared first, so after
/// dispatch `state.status()` reports on this action only.
pub fn dispatch(
    action: Action,
    state: &mut EditorState,
    settings: &EditSettings,
) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", mode = %state.mode(), ?action, "dispatch");
    let had_status = state.status().is_some();
    state.clear_status();
    let mut result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, state, settings),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Edit(kind) => edit::handle_edit(kind, state, settings),
        Action::Undo => undo::handle_undo(state),
        Action::CommandStart(_)
        | Action::CommandText(_)
        | Action::CommandBackspace
        | Action::CommandCancel
        | Action::CommandSubmit => command::handle_command_action(action, state),
        Action::SearchNext { reverse } => search::handle_search_next(reverse, state),
    };
    if had_status {
        result.dirty = true;
    }
    result
}

/// One editing session's key handler: translation table plus settings.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    settings: EditSettings,
}

impl Dispatcher {
    pub fn new(settings: EditSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    /// Translate `key` in the current mode and apply it. Keys without a
    /// binding are ignored.
    pub fn handle_key(&self, state: &mut EditorState, key: &KeyEvent) -> DispatchResult {
        match key_translator::translate(state.mode(), key) {
            Some(action) => dispatch(action, state, &self.settings),
            None => {
                tracing::trace!(target: "actions.dispatch", mode = %state.mode(), %key, "unbound_key");
                DispatchResult::clean()
            }
        }
    }

    /// Feed keys until one of them quits. Returns true if the session quit.
    pub fn handle_keys<'a>(
        &self,
        state: &mut EditorState,
        keys: impl IntoIterator<Item = &'a KeyEvent>,
    ) -> bool {
        keys.into_iter()
            .any(|key| self.handle_key(state, key).quit)
    }
}
