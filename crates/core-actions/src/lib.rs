//! Modal key dispatch.
//!
//! Keys flow through two stages:
//! 1. [`key_translator::translate`] maps `(EditorMode, KeyEvent)` to an
//!    [`Action`]. The table is flat and stateless; chord state lives in the
//!    mode itself (`DELETE`, `GO`).
//! 2. [`dispatcher::dispatch`] applies the action to an
//!    [`core_state::EditorState`], either moving the cursor, executing an
//!    edit command through the buffer's history, or switching modes.
//!
//! [`Dispatcher`] bundles both stages with the session's [`EditSettings`].

pub mod dispatcher;
pub mod key_script;
pub mod key_translator;
pub mod search;

pub use core_config::EditSettings;
pub use dispatcher::{DispatchResult, Dispatcher, dispatch};
pub use key_script::{KeyScriptError, parse_key_script};
pub use key_translator::translate;

use core_state::EditorMode;

/// Pure cursor movement. Never touches the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    FirstLine,
    LastLine,
}

/// Document edits; each maps to one history command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Typed text in insert mode.
    InsertText(String),
    /// Tab in insert mode; expands to `tab_width` spaces.
    InsertTab,
    BreakLine,
    /// Backspace in insert mode.
    DeleteCharBefore,
    /// `x`
    DeleteCharUnder,
    /// `J`
    JoinLines,
    /// `o`
    OpenLineBelow,
    /// `O`
    OpenLineAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// `i`
    EnterInsert,
    /// `a`: step over the character under the cursor first.
    EnterInsertAfter,
    /// `I`
    EnterInsertLineStart,
    /// `A`
    EnterInsertLineEnd,
    /// `d`
    ArmDelete,
    /// `g`
    ArmGo,
    /// Second `d` of `dd`.
    ConfirmDelete,
    /// Second `g` of `gg`.
    ConfirmGo,
    /// Escape back to command mode.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    Edit(EditKind),
    ModeChange(ModeChange),
    /// Open the command line in one of the prompt modes.
    CommandStart(EditorMode),
    CommandText(String),
    CommandBackspace,
    CommandCancel,
    CommandSubmit,
    Undo,
    /// `n` (`reverse = false`) / `N` (`reverse = true`).
    SearchNext {
        reverse: bool,
    },
}
