//! Commands that edit characters within one line.

use core_text::{ChangeKind, Cursor, EOL, Position};
use tracing::trace;

use super::{Command, CommandResult, Record, refuse, tag_line};
use crate::memento::LineMemento;

/// Delete the character before the cursor (Backspace in insert mode).
#[derive(Debug, Clone, Default)]
pub struct DeleteSingleChar {
    record: Record,
}

impl DeleteSingleChar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for DeleteSingleChar {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        if pos.column <= 1 {
            return CommandResult::refused_with("at line beginning");
        }
        let target = Position::new(pos.line, pos.column - 1);
        let removed = self.record.apply(cursor, |doc, log| {
            log.push(LineMemento::Replace {
                line: pos.line,
                saved: doc.line_snapshot(pos.line)?,
            });
            tag_line(doc, pos.line, ChangeKind::Modified, true)?;
            doc.delete_chars(target, 1)
        });
        match removed {
            Ok(removed) => {
                cursor.to_pos(target);
                trace!(target: "state.command", command = self.name(), line = pos.line, column = target.column, "executed");
                CommandResult::done_with(removed)
            }
            Err(err) => refuse(self.name(), err),
        }
    }

    fn undo(&mut self, cursor: &mut Cursor) {
        let name = self.name();
        self.record.revert(cursor, name);
    }

    fn name(&self) -> &'static str {
        "DeleteSingleChar"
    }
}

/// Delete the character under the cursor (`x`). On the end-of-line slot the
/// last character of the line goes instead.
#[derive(Debug, Clone, Default)]
pub struct DeleteSingleCharAfter {
    record: Record,
}

impl DeleteSingleCharAfter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for DeleteSingleCharAfter {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        let len = match cursor.with_document(|d| d.line_length(pos.line)) {
            Ok(Ok(len)) => len,
            Ok(Err(err)) | Err(err) => return refuse(self.name(), err),
        };
        if len <= 1 {
            return CommandResult::refused_with("nothing to delete");
        }
        let target = Position::new(pos.line, pos.column.min(len - 1));
        let removed = self.record.apply(cursor, |doc, log| {
            log.push(LineMemento::Replace {
                line: pos.line,
                saved: doc.line_snapshot(pos.line)?,
            });
            tag_line(doc, pos.line, ChangeKind::Modified, true)?;
            doc.delete_chars(target, 1)
        });
        match removed {
            Ok(removed) => {
                if target != pos {
                    cursor.to_pos(target);
                }
                trace!(target: "state.command", command = self.name(), line = pos.line, column = target.column, "executed");
                CommandResult::done_with(removed)
            }
            Err(err) => refuse(self.name(), err),
        }
    }

    fn undo(&mut self, cursor: &mut Cursor) {
        let name = self.name();
        self.record.revert(cursor, name);
    }

    fn name(&self) -> &'static str {
        "DeleteSingleCharAfter"
    }
}

/// Insert text at the cursor (typing in insert mode).
///
/// A run of keystrokes on the same line grows one command through
/// [`InsertString::extend`], so a single undo removes the whole run.
#[derive(Debug, Clone)]
pub struct InsertString {
    text: String,
    record: Record,
}

impl InsertString {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            record: Record::default(),
        }
    }

    /// Everything inserted so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line this command edited, once executed.
    pub fn line(&self) -> Option<usize> {
        self.record.mementos().first().map(LineMemento::line)
    }

    /// Insert `more` at the cursor as part of this command. Refused when the
    /// cursor has left the line the command started on.
    pub fn extend(&mut self, cursor: &mut Cursor, more: &str) -> CommandResult {
        if !is_inline(more) {
            return CommandResult::refused_with("text must be a non-empty single line");
        }
        if self.line() != Some(cursor.line()) {
            return CommandResult::refused_with("cursor left the edited line");
        }
        match cursor.insert_string(more) {
            Ok(()) => {
                self.text.push_str(more);
                trace!(target: "state.command", command = self.name(), chars = self.text.chars().count(), "extended");
                CommandResult::done()
            }
            Err(err) => refuse(self.name(), err),
        }
    }
}

fn is_inline(text: &str) -> bool {
    !text.is_empty() && !text.contains(EOL) && !text.contains('\r')
}

impl Command for InsertString {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        if !is_inline(&self.text) {
            return CommandResult::refused_with("text must be a non-empty single line");
        }
        let pos = self.record.begin(cursor);
        let text = self.text.as_str();
        let inserted = self.record.apply(cursor, |doc, log| {
            log.push(LineMemento::Replace {
                line: pos.line,
                saved: doc.line_snapshot(pos.line)?,
            });
            tag_line(doc, pos.line, ChangeKind::Modified, true)?;
            doc.insert_chars(pos, text)
        });
        match inserted {
            Ok(()) => {
                let column = pos.column + self.text.chars().count();
                cursor.to_pos(Position::new(pos.line, column));
                trace!(target: "state.command", command = self.name(), line = pos.line, column = pos.column, chars = self.text.chars().count(), "executed");
                CommandResult::done()
            }
            Err(err) => refuse(self.name(), err),
        }
    }

    fn undo(&mut self, cursor: &mut Cursor) {
        let name = self.name();
        self.record.revert(cursor, name);
    }

    fn name(&self) -> &'static str {
        "InsertString"
    }
}
