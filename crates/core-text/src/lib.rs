//! Line-oriented text document model.
//!
//! [`TextDocument`] stores the lines and their annotations; [`Cursor`] moves
//! through a document shared via [`SharedDocument`] and delegates edits to it.
//! Positions are 1-based `(line, column)` pairs where columns count
//! characters and the end-of-line marker occupies the last column.

use std::cell::RefCell;
use std::rc::Rc;

pub mod cursor;
pub mod document;
pub mod error;
pub mod line;
pub mod line_ending;
pub mod meta;

pub use cursor::Cursor;
pub use document::{DocumentObserver, TextDocument};
pub use error::{DocumentError, Result};
pub use line::Line;
pub use line_ending::{EOL, LineEnding, normalize_line_endings};
pub use meta::{
    ChangeKind, CharMeta, DocumentMeta, LineMeta, LintLevel, LinterResult, MetaValue, keys,
};

/// Document handle shared between a buffer and its cursors.
pub type SharedDocument = Rc<RefCell<TextDocument>>;

/// Wrap a document for sharing with cursors.
pub fn share(document: TextDocument) -> SharedDocument {
    Rc::new(RefCell::new(document))
}

/// A 1-based position inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn origin() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// Identity of a cursor in its document's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorId(pub(crate) u64);

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
