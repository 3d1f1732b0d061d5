//! Editing session state: the buffer aggregate, reversible commands and the
//! editor mode.
//!
//! A [`Buffer`] bundles one shared document, its primary cursor and the
//! [`CommandHistory`]. Every edit is an [`EditCommand`] executed against the
//! cursor; a successful command is pushed on the history and `undo` pops and
//! reverts the newest one. There is no redo stack: re-running a popped
//! command is the caller's business.
//!
//! Insert runs:
//! - Text typed in insert mode grows the newest `InsertString` command as long
//!   as a run is active, so one undo removes a whole burst of typing.
//! - A run starts with the first inserted text and ends on any other command,
//!   undo, navigation or mode change (the dispatcher calls
//!   [`Buffer::end_insert_run`]).

use std::path::Path;

use core_text::{Cursor, SharedDocument, TextDocument};
use tracing::trace;

pub mod command;
pub mod history;
pub mod memento;

pub use command::{
    BreakLine, Command, CommandResult, DeleteLineAtCursor, DeleteSingleChar,
    DeleteSingleCharAfter, EditCommand, InsertString, JoinWithNextLine, NewLine, NewLineAfter,
};
pub use history::{CommandHistory, HISTORY_DEPTH_DEFAULT};
pub use memento::LineMemento;

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// Navigation and single-key commands.
    #[default]
    Command,
    /// Typed text goes into the document.
    Insert,
    /// `d` pressed; waiting for the confirming key.
    Delete,
    /// `g` pressed; waiting for the confirming key.
    Go,
    /// Typing an ex-style command after `:`.
    CommandInput,
    /// Typing a pattern after `/`.
    SearchForward,
    /// Typing a pattern after `?`.
    SearchBackward,
}

impl EditorMode {
    /// Prompt character shown in front of the command line.
    pub fn prompt(self) -> Option<char> {
        match self {
            EditorMode::CommandInput => Some(':'),
            EditorMode::SearchForward => Some('/'),
            EditorMode::SearchBackward => Some('?'),
            _ => None,
        }
    }

    pub fn is_command_line(self) -> bool {
        self.prompt().is_some()
    }

    /// Modes armed by the first key of a two-key chord.
    pub fn is_pending_chord(self) -> bool {
        matches!(self, EditorMode::Delete | EditorMode::Go)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EditorMode::Command => "COMMAND",
            EditorMode::Insert => "INSERT",
            EditorMode::Delete => "DELETE",
            EditorMode::Go => "GO",
            EditorMode::CommandInput => "COMMAND_INPUT",
            EditorMode::SearchForward => "SEARCH_FORWARD",
            EditorMode::SearchBackward => "SEARCH_BACKWARD",
        }
    }
}

impl std::fmt::Display for EditorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text typed into the command line, without its prompt character.
#[derive(Debug, Default, Clone)]
pub struct CommandLineState {
    buf: String,
}

impl CommandLineState {
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Remove the last character. Returns false when there was nothing to
    /// remove.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    /// Hand out the typed text and clear the line.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

/// Insert run tracking for [`Buffer::insert_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertRun {
    #[default]
    Inactive,
    Active {
        edits: u32,
    },
}

/// Document, primary cursor and command history.
pub struct Buffer {
    document: SharedDocument,
    cursor: Cursor,
    history: CommandHistory,
    insert_run: InsertRun,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("cursor", &self.cursor)
            .field("history", &self.history.len())
            .field("insert_run", &self.insert_run)
            .finish()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(TextDocument::new())
    }
}

impl Buffer {
    pub fn new(document: TextDocument) -> Self {
        Self::with_history_depth(document, HISTORY_DEPTH_DEFAULT)
    }

    pub fn with_history_depth(document: TextDocument, max_depth: usize) -> Self {
        let cursor = Cursor::attach(document);
        Self {
            document: SharedDocument::clone(cursor.document()),
            cursor,
            history: CommandHistory::new(max_depth),
            insert_run: InsertRun::Inactive,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> core_text::Result<Self> {
        Ok(Self::new(TextDocument::open(path)?))
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    pub fn insert_run(&self) -> InsertRun {
        self.insert_run
    }

    /// Execute `command` at the cursor; on success it joins the history.
    pub fn execute(&mut self, command: impl Into<EditCommand>) -> CommandResult {
        self.end_insert_run();
        let mut command = command.into();
        let result = command.execute(&mut self.cursor);
        if result.success {
            self.history.push(command);
        } else {
            trace!(target: "state.history", command = command.name(), info = ?result.info, "not_recorded");
        }
        result
    }

    /// Revert the newest command. Returns false with an empty history.
    pub fn undo(&mut self) -> bool {
        self.end_insert_run();
        match self.history.pop() {
            Some(mut command) => {
                command.undo(&mut self.cursor);
                true
            }
            None => false,
        }
    }

    /// Insert `text` at the cursor, growing the open insert run when there
    /// is one.
    pub fn insert_text(&mut self, text: &str) -> CommandResult {
        if let InsertRun::Active { edits } = self.insert_run
            && let Some(EditCommand::InsertString(open)) = self.history.last_mut()
        {
            let result = open.extend(&mut self.cursor, text);
            if result.success {
                self.insert_run = InsertRun::Active { edits: edits + 1 };
                return result;
            }
        }
        let result = self.execute(InsertString::new(text));
        if result.success {
            self.insert_run = InsertRun::Active { edits: 1 };
        }
        result
    }

    pub fn end_insert_run(&mut self) {
        if let InsertRun::Active { edits } = self.insert_run {
            trace!(target: "state.history", edits, "insert_run_end");
        }
        self.insert_run = InsertRun::Inactive;
    }
}

/// Last submitted search, repeated by `n` / `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub pattern: String,
    pub forward: bool,
}

/// Everything one editing session owns.
#[derive(Debug, Default)]
pub struct EditorState {
    pub buffer: Buffer,
    mode: EditorMode,
    pub command_line: CommandLineState,
    pub last_search: Option<SearchRequest>,
    status: Option<String>,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch modes. Any change ends the open insert run.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode != self.mode {
            trace!(target: "state.mode", from = %self.mode, to = %mode, "mode_change");
            self.buffer.end_insert_run();
            self.mode = mode;
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
