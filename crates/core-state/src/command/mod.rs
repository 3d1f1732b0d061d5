//! Reversible edit commands.
//!
//! Every command snapshots the lines it is about to change as
//! [`LineMemento`]s, so `undo` puts content, line annotations and character
//! annotations back exactly and then returns the cursor to where the command
//! started. Running a command again after `undo` replays it from that same
//! starting position.
//!
//! Commands never fail with an error. A request that cannot apply (deleting
//! from an empty document, joining past the last line) comes back as a
//! refused [`CommandResult`] with the document untouched.

mod chars;
mod lines;

pub use chars::{DeleteSingleChar, DeleteSingleCharAfter, InsertString};
pub use lines::{BreakLine, DeleteLineAtCursor, JoinWithNextLine, NewLine, NewLineAfter};

use core_text::{ChangeKind, Cursor, LineMeta, MetaValue, Position, TextDocument, keys};
use tracing::{debug, trace, warn};

use crate::memento::LineMemento;

/// Outcome of [`Command::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub success: bool,
    /// Command specific payload, e.g. the text a delete removed, or the
    /// reason a request was refused.
    pub info: Option<String>,
}

impl CommandResult {
    pub fn done() -> Self {
        Self {
            success: true,
            info: None,
        }
    }

    pub fn done_with(info: impl Into<String>) -> Self {
        Self {
            success: true,
            info: Some(info.into()),
        }
    }

    pub fn refused() -> Self {
        Self {
            success: false,
            info: None,
        }
    }

    pub fn refused_with(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            info: Some(reason.into()),
        }
    }
}

pub trait Command {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult;
    fn undo(&mut self, cursor: &mut Cursor);
    fn name(&self) -> &'static str;
}

/// Starting position and mementos of the latest execution.
#[derive(Debug, Clone, Default)]
pub(crate) struct Record {
    origin: Option<Position>,
    mementos: Vec<LineMemento>,
}

impl Record {
    /// Prepare an execution. The first run remembers where the cursor is;
    /// later runs move the cursor back there first.
    pub(crate) fn begin(&mut self, cursor: &mut Cursor) -> Position {
        match self.origin {
            Some(origin) if cursor.to_pos(origin) => {}
            _ => self.origin = Some(cursor.pos()),
        }
        self.mementos.clear();
        cursor.pos()
    }

    pub(crate) fn mementos(&self) -> &[LineMemento] {
        &self.mementos
    }

    /// Run `edit` against the document. `edit` pushes a memento before each
    /// step it takes; if it fails part way the recorded steps are reverted
    /// before the error is returned.
    pub(crate) fn apply<T>(
        &mut self,
        cursor: &Cursor,
        edit: impl FnOnce(&mut TextDocument, &mut Vec<LineMemento>) -> core_text::Result<T>,
    ) -> core_text::Result<T> {
        let mementos = &mut self.mementos;
        cursor.with_document_mut(|doc| {
            let outcome = edit(doc, mementos);
            if outcome.is_err() {
                revert_all(doc, mementos);
            }
            outcome
        })
    }

    /// Undo the latest execution and restore the starting position.
    pub(crate) fn revert(&mut self, cursor: &mut Cursor, name: &'static str) {
        if self.mementos.is_empty() {
            trace!(target: "state.command", command = name, "undo_without_execute");
            return;
        }
        let mementos = &mut self.mementos;
        let restored = cursor.with_document_mut(|doc| {
            revert_all(doc, mementos);
            Ok(())
        });
        if let Err(err) = restored {
            warn!(target: "state.command", command = name, error = %err, "undo_failed");
            return;
        }
        if let Some(origin) = self.origin {
            cursor.to_pos(origin);
        }
        trace!(target: "state.command", command = name, "undone");
    }
}

fn revert_all(doc: &mut TextDocument, mementos: &mut Vec<LineMemento>) {
    while let Some(memento) = mementos.pop() {
        let line = memento.line();
        if let Err(err) = memento.revert(doc) {
            warn!(target: "state.command", line, error = %err, "memento_revert_failed");
        }
    }
}

/// Set the change tag of `line`. With `only_if_untagged` an existing tag is
/// left alone.
pub(crate) fn tag_line(
    doc: &mut TextDocument,
    line: usize,
    kind: ChangeKind,
    only_if_untagged: bool,
) -> core_text::Result<()> {
    if only_if_untagged && doc.line(line)?.change().is_some() {
        return Ok(());
    }
    let mut meta = LineMeta::new();
    meta.insert(keys::CHANGE.to_string(), MetaValue::Change(kind));
    doc.update_line_meta(line, meta)
}

/// Leading spaces and tabs of `line`.
pub(crate) fn indentation(doc: &TextDocument, line: usize) -> core_text::Result<String> {
    Ok(doc
        .line(line)?
        .content()
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect())
}

pub(crate) fn refuse(name: &'static str, err: core_text::DocumentError) -> CommandResult {
    debug!(target: "state.command", command = name, error = %err, "refused");
    CommandResult::refused_with(err.to_string())
}

/// The closed set of commands the history stores.
#[derive(Debug, Clone)]
pub enum EditCommand {
    NewLine(NewLine),
    NewLineAfter(NewLineAfter),
    DeleteLineAtCursor(DeleteLineAtCursor),
    DeleteSingleChar(DeleteSingleChar),
    DeleteSingleCharAfter(DeleteSingleCharAfter),
    BreakLine(BreakLine),
    JoinWithNextLine(JoinWithNextLine),
    InsertString(InsertString),
}

impl EditCommand {
    fn inner(&mut self) -> &mut dyn Command {
        match self {
            EditCommand::NewLine(c) => c,
            EditCommand::NewLineAfter(c) => c,
            EditCommand::DeleteLineAtCursor(c) => c,
            EditCommand::DeleteSingleChar(c) => c,
            EditCommand::DeleteSingleCharAfter(c) => c,
            EditCommand::BreakLine(c) => c,
            EditCommand::JoinWithNextLine(c) => c,
            EditCommand::InsertString(c) => c,
        }
    }
}

impl Command for EditCommand {
    fn execute(&mut self, cursor: &mut Cursor) -> CommandResult {
        self.inner().execute(cursor)
    }

    fn undo(&mut self, cursor: &mut Cursor) {
        self.inner().undo(cursor)
    }

    fn name(&self) -> &'static str {
        match self {
            EditCommand::NewLine(c) => c.name(),
            EditCommand::NewLineAfter(c) => c.name(),
            EditCommand::DeleteLineAtCursor(c) => c.name(),
            EditCommand::DeleteSingleChar(c) => c.name(),
            EditCommand::DeleteSingleCharAfter(c) => c.name(),
            EditCommand::BreakLine(c) => c.name(),
            EditCommand::JoinWithNextLine(c) => c.name(),
            EditCommand::InsertString(c) => c.name(),
        }
    }
}

macro_rules! into_edit_command {
    ($($ty:ident),* $(,)?) => {
        $(impl From<$ty> for EditCommand {
            fn from(cmd: $ty) -> Self {
                EditCommand::$ty(cmd)
            }
        })*
    };
}

into_edit_command!(
    NewLine,
    NewLineAfter,
    DeleteLineAtCursor,
    DeleteSingleChar,
    DeleteSingleCharAfter,
    BreakLine,
    JoinWithNextLine,
    InsertString,
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cursor_on(text: &str) -> Cursor {
        Cursor::attach(TextDocument::from_text(text))
    }

    fn text(cursor: &Cursor) -> String {
        cursor.document().borrow().document_text()
    }

    fn change(cursor: &Cursor, line: usize) -> Option<ChangeKind> {
        cursor.document().borrow().line(line).unwrap().change()
    }

    #[test]
    fn new_line_after_tags_and_moves() {
        let mut c = cursor_on("a\nb\n");
        let mut cmd = NewLineAfter::new(true);
        assert!(cmd.execute(&mut c).success);
        assert_eq!(text(&c), "a\n\nb\n");
        assert_eq!(change(&c, 2), Some(ChangeKind::Added));
        assert_eq!(change(&c, 1), None);
        assert_eq!(c.pos(), Position::new(2, 1));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "a\nb\n");
        assert_eq!(c.pos(), Position::new(1, 1));
    }

    #[test]
    fn new_line_after_copies_indentation() {
        let mut c = cursor_on("if x:\n    y = 1\n");
        c.to_pos(Position::new(2, 7));
        let mut cmd = NewLineAfter::new(true);
        assert!(cmd.execute(&mut c).success);
        assert_eq!(text(&c), "if x:\n    y = 1\n    \n");
        assert_eq!(c.pos(), Position::new(3, 5));

        let mut plain = cursor_on("    y\n");
        let mut cmd = NewLineAfter::new(false);
        cmd.execute(&mut plain);
        assert_eq!(text(&plain), "    y\n\n");
        assert_eq!(plain.pos(), Position::new(2, 1));
    }

    #[test]
    fn new_line_opens_above() {
        let mut c = cursor_on("  a\nb\n");
        let mut cmd = NewLine::new(true);
        assert!(cmd.execute(&mut c).success);
        assert_eq!(text(&c), "  \n  a\nb\n");
        assert_eq!(c.pos(), Position::new(1, 3));
        assert_eq!(change(&c, 1), Some(ChangeKind::Added));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "  a\nb\n");
        assert_eq!(c.pos(), Position::new(1, 1));
    }

    #[test]
    fn delete_line_refused_on_empty_document() {
        let mut c = cursor_on("");
        let mut cmd = DeleteLineAtCursor::new();
        let result = cmd.execute(&mut c);
        assert!(!result.success);
        assert!(!c.document().borrow().is_modified());
    }

    #[test]
    fn delete_line_reports_removed_text() {
        let mut c = cursor_on("one\ntwo\nthree\n");
        c.to_pos(Position::new(2, 3));
        let mut cmd = DeleteLineAtCursor::new();
        let result = cmd.execute(&mut c);
        assert_eq!(result, CommandResult::done_with("two\n"));
        assert_eq!(text(&c), "one\nthree\n");
        assert_eq!(c.pos(), Position::new(2, 3));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "one\ntwo\nthree\n");
        assert_eq!(c.pos(), Position::new(2, 3));
    }

    #[test]
    fn delete_sole_line_undo_restores_it() {
        let mut c = cursor_on("only\n");
        c.to_pos(Position::new(1, 3));
        let mut cmd = DeleteLineAtCursor::new();
        assert!(cmd.execute(&mut c).success);
        assert_eq!(text(&c), "\n");
        assert_eq!(c.pos(), Position::new(1, 1));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "only\n");
        assert_eq!(c.pos(), Position::new(1, 3));
    }

    #[test]
    fn backspace_tags_once_and_untags_on_undo() {
        let mut c = cursor_on("abc\n");
        c.to_pos(Position::new(1, 3));
        let mut cmd = DeleteSingleChar::new();
        assert_eq!(cmd.execute(&mut c), CommandResult::done_with("b"));
        assert_eq!(text(&c), "ac\n");
        assert_eq!(c.pos(), Position::new(1, 2));
        assert_eq!(change(&c, 1), Some(ChangeKind::Modified));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "abc\n");
        assert_eq!(change(&c, 1), None);
        assert_eq!(c.pos(), Position::new(1, 3));

        c.to_line_beginning();
        assert!(!DeleteSingleChar::new().execute(&mut c).success);
    }

    #[test]
    fn existing_tag_survives_round_trip() {
        let mut c = cursor_on("abc\n");
        {
            let mut doc = c.document().borrow_mut();
            tag_line(&mut doc, 1, ChangeKind::Added, false).unwrap();
        }
        c.to_pos(Position::new(1, 2));
        let mut cmd = InsertString::new("zz");
        cmd.execute(&mut c);
        assert_eq!(change(&c, 1), Some(ChangeKind::Added));
        cmd.undo(&mut c);
        assert_eq!(change(&c, 1), Some(ChangeKind::Added));
        assert_eq!(text(&c), "abc\n");
    }

    #[test]
    fn delete_after_cursor() {
        let mut c = cursor_on("abc\n\n");
        c.to_pos(Position::new(1, 2));
        let mut cmd = DeleteSingleCharAfter::new();
        assert_eq!(cmd.execute(&mut c), CommandResult::done_with("b"));
        assert_eq!(text(&c), "ac\n\n");
        cmd.undo(&mut c);
        assert_eq!(text(&c), "abc\n\n");

        c.to_pos(Position::new(2, 1));
        assert!(!DeleteSingleCharAfter::new().execute(&mut c).success);
    }

    #[test]
    fn break_line_has_exact_inverse() {
        let mut c = cursor_on("hello world\nnext\n");
        c.to_pos(Position::new(1, 6));
        let mut cmd = BreakLine::new();
        assert!(cmd.execute(&mut c).success);
        assert_eq!(text(&c), "hello\n world\nnext\n");
        assert_eq!(change(&c, 1), Some(ChangeKind::Modified));
        assert_eq!(change(&c, 2), Some(ChangeKind::Added));
        assert_eq!(c.pos(), Position::new(2, 1));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "hello world\nnext\n");
        assert_eq!(change(&c, 1), None);
        assert_eq!(c.pos(), Position::new(1, 6));
    }

    #[test]
    fn join_refused_on_last_line() {
        let mut c = cursor_on("a\nb\n");
        c.to_last_line();
        let mut cmd = JoinWithNextLine::new();
        assert!(!cmd.execute(&mut c).success);
        assert!(!c.document().borrow().is_modified());

        c.to_first_line();
        let mut cmd = JoinWithNextLine::new();
        assert!(cmd.execute(&mut c).success);
        assert_eq!(text(&c), "ab\n");
        cmd.undo(&mut c);
        assert_eq!(text(&c), "a\nb\n");
    }

    #[test]
    fn insert_string_extends_and_undoes_whole_run() {
        let mut c = cursor_on("ad\n");
        c.to_pos(Position::new(1, 2));
        let mut cmd = InsertString::new("b");
        assert!(cmd.execute(&mut c).success);
        assert!(cmd.extend(&mut c, "c").success);
        assert_eq!(cmd.text(), "bc");
        assert_eq!(text(&c), "abcd\n");
        assert_eq!(c.pos(), Position::new(1, 4));
        cmd.undo(&mut c);
        assert_eq!(text(&c), "ad\n");
        assert_eq!(c.pos(), Position::new(1, 2));
    }

    #[test]
    fn insert_string_rejects_marker() {
        let mut c = cursor_on("a\n");
        assert!(!InsertString::new("x\ny").execute(&mut c).success);
        assert!(!InsertString::new("").execute(&mut c).success);
        assert_eq!(text(&c), "a\n");
    }

    #[test]
    fn replay_after_undo_starts_from_origin() {
        let mut c = cursor_on("a\nb\nc\nd\n");
        let mut cmd = NewLineAfter::new(true);
        cmd.execute(&mut c);
        cmd.undo(&mut c);
        c.to_pos(Position::new(4, 1));
        cmd.execute(&mut c);
        assert_eq!(text(&c), "a\n\nb\nc\nd\n");
        assert_eq!(c.pos(), Position::new(2, 1));
    }

    #[test]
    fn edit_command_dispatches_by_variant() {
        let mut c = cursor_on("xy\n");
        let mut cmd: EditCommand = DeleteSingleCharAfter::new().into();
        assert_eq!(cmd.name(), "DeleteSingleCharAfter");
        assert!(cmd.execute(&mut c).success);
        cmd.undo(&mut c);
        assert_eq!(text(&c), "xy\n");
    }
}
