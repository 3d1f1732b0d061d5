//! Commands that add, remove, split or merge whole lines.

use core_text::{ChangeKind, Cursor, Position};
use tracing::trace;

use super::{Command, CommandResult, Record, indentation, refuse, tag_line};
use crate::memento::LineMemento;

/// Open a line below the cursor (`o`).
#[derive(Debug, Clone, Default)]
pub struct NewLineAfter {
    auto_indent: bool,
    record: Record,
}

impl NewLineAfter {
    /// With `auto_indent` the new line starts with the current line's
    /// indentation and the cursor lands after it.
    pub fn new(auto_indent: bool) -> Self {
        Self {
            auto_indent,
            record: Record::default(),
        }
    }
}

impl Command for NewLineAfter {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        let auto_indent = self.auto_indent;
        let opened = self.record.apply(cursor, |doc, log| {
            let indent = if auto_indent {
                indentation(doc, pos.line)?
            } else {
                String::new()
            };
            doc.new_line_after(pos.line)?;
            log.push(LineMemento::Remove { line: pos.line + 1 });
            doc.insert_chars(Position::new(pos.line + 1, 1), &indent)?;
            tag_line(doc, pos.line + 1, ChangeKind::Added, false)?;
            Ok(indent.chars().count())
        });
        match opened {
            Ok(indent) => {
                cursor.to_pos(Position::new(pos.line + 1, indent + 1));
                trace!(target: "state.command", command = self.name(), line = pos.line + 1, indent, "executed");
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
        "NewLineAfter"
    }
}

/// Open a line above the cursor (`O`).
#[derive(Debug, Clone, Default)]
pub struct NewLine {
    auto_indent: bool,
    record: Record,
}

impl NewLine {
    pub fn new(auto_indent: bool) -> Self {
        Self {
            auto_indent,
            record: Record::default(),
        }
    }
}

impl Command for NewLine {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        let auto_indent = self.auto_indent;
        let opened = self.record.apply(cursor, |doc, log| {
            let indent = if auto_indent {
                indentation(doc, pos.line)?
            } else {
                String::new()
            };
            doc.new_line(pos.line)?;
            log.push(LineMemento::Remove { line: pos.line });
            doc.insert_chars(Position::new(pos.line, 1), &indent)?;
            tag_line(doc, pos.line, ChangeKind::Added, false)?;
            Ok(indent.chars().count())
        });
        match opened {
            Ok(indent) => {
                cursor.to_pos(Position::new(pos.line, indent + 1));
                trace!(target: "state.command", command = self.name(), line = pos.line, indent, "executed");
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
        "NewLine"
    }
}

/// Delete the cursor's line (`dd`). The removed text is the result info.
#[derive(Debug, Clone, Default)]
pub struct DeleteLineAtCursor {
    record: Record,
}

impl DeleteLineAtCursor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for DeleteLineAtCursor {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        let shape = cursor.with_document(|d| (d.is_empty(), d.num_lines()));
        let (empty, num_lines) = match shape {
            Ok(shape) => shape,
            Err(err) => return refuse(self.name(), err),
        };
        if empty {
            return CommandResult::refused_with("document is empty");
        }
        if pos.line == num_lines {
            cursor.to_line_prev();
        }
        let removed = self.record.apply(cursor, |doc, log| {
            let saved = doc.line_snapshot(pos.line)?;
            log.push(if doc.num_lines() == 1 {
                LineMemento::Replace { line: 1, saved }
            } else {
                LineMemento::Insert {
                    line: pos.line,
                    saved,
                }
            });
            doc.delete_line(pos.line)
        });
        match removed {
            Ok(removed) => {
                // Re-emit the position the document clamped the cursor to.
                let now = cursor.pos();
                cursor.to_pos(now);
                trace!(target: "state.command", command = self.name(), line = pos.line, "executed");
                CommandResult::done_with(removed)
            }
            Err(err) => {
                cursor.to_pos(pos);
                refuse(self.name(), err)
            }
        }
    }

    fn undo(&mut self, cursor: &mut Cursor) {
        let name = self.name();
        self.record.revert(cursor, name);
    }

    fn name(&self) -> &'static str {
        "DeleteLineAtCursor"
    }
}

/// Split the line at the cursor (Enter in insert mode).
#[derive(Debug, Clone, Default)]
pub struct BreakLine {
    record: Record,
}

impl BreakLine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for BreakLine {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        let split = self.record.apply(cursor, |doc, log| {
            log.push(LineMemento::Replace {
                line: pos.line,
                saved: doc.line_snapshot(pos.line)?,
            });
            doc.break_line(pos)?;
            log.push(LineMemento::Remove { line: pos.line + 1 });
            tag_line(doc, pos.line, ChangeKind::Modified, true)?;
            tag_line(doc, pos.line + 1, ChangeKind::Added, false)
        });
        match split {
            Ok(()) => {
                cursor.to_pos(Position::new(pos.line + 1, 1));
                trace!(target: "state.command", command = self.name(), line = pos.line, column = pos.column, "executed");
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
        "BreakLine"
    }
}

/// Append the next line to the cursor's line (`J`).
#[derive(Debug, Clone, Default)]
pub struct JoinWithNextLine {
    record: Record,
}

impl JoinWithNextLine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Command for JoinWithNextLine {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        let pos = self.record.begin(cursor);
        match cursor.with_document(|d| d.num_lines()) {
            Ok(num_lines) if pos.line < num_lines => {}
            Ok(_) => return CommandResult::refused_with("no line below"),
            Err(err) => return refuse(self.name(), err),
        }
        let joined = self.record.apply(cursor, |doc, log| {
            log.push(LineMemento::Replace {
                line: pos.line,
                saved: doc.line_snapshot(pos.line)?,
            });
            log.push(LineMemento::Insert {
                line: pos.line + 1,
                saved: doc.line_snapshot(pos.line + 1)?,
            });
            doc.join_with_next_line(pos.line)?;
            tag_line(doc, pos.line, ChangeKind::Modified, true)
        });
        match joined {
            Ok(()) => {
                trace!(target: "state.command", command = self.name(), line = pos.line, "executed");
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
        "JoinWithNextLine"
    }
}
