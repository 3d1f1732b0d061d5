//! Whole-line mementos.
//!
//! A command records one memento per line it touches, in the order it
//! touched them; undo replays them newest first. Each memento describes the
//! action that reverses one step: put a saved line back in place, re-insert a
//! removed line, or remove a line the command added.

use core_text::{Line, TextDocument};

#[derive(Debug, Clone, PartialEq)]
pub enum LineMemento {
    /// Line `line` was changed in place; restore the saved copy.
    Replace { line: usize, saved: Line },
    /// Line `line` was removed; insert the saved copy back at that index.
    Insert { line: usize, saved: Line },
    /// Line `line` was added; remove it.
    Remove { line: usize },
}

impl LineMemento {
    pub fn line(&self) -> usize {
        match self {
            LineMemento::Replace { line, .. }
            | LineMemento::Insert { line, .. }
            | LineMemento::Remove { line } => *line,
        }
    }

    pub(crate) fn revert(self, doc: &mut TextDocument) -> core_text::Result<()> {
        match self {
            LineMemento::Replace { line, saved } => doc.restore_line(line, saved),
            LineMemento::Insert { line, saved } => doc.insert_line_snapshot(line, saved),
            LineMemento::Remove { line } => doc.delete_line(line).map(|_| ()),
        }
    }
}
