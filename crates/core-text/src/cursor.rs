//! Cursor bound to a shared document.
//!
//! A cursor keeps its position in a slot shared with the document's cursor
//! registry; the document only holds a weak reference, so dropping the
//! cursor is enough to make the entry stale, and `Drop` removes it eagerly.
//! Shrinking edits re-clamp the slot without going through the cursor; the
//! cursor announces that move the next time its position is read.
//!
//! Navigation returns `bool` (false leaves the cursor unchanged). Mutating
//! helpers return `Result` and fail with [`DocumentError::ReentrantMutation`]
//! when the document is already borrowed, which is the case while it is
//! delivering a change notification.

use std::cell::{Cell, Ref};
use std::rc::Rc;

use core_events::{CursorEvent, CursorObserver};

use crate::document::TextDocument;
use crate::error::{DocumentError, Result};
use crate::meta::LineMeta;
use crate::{CursorId, Position, SharedDocument, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CursorSlot {
    pub(crate) pos: Position,
    pub(crate) desired_column: usize,
    /// Re-clamped by the document and not yet announced.
    pub(crate) displaced: bool,
}

pub struct Cursor {
    document: SharedDocument,
    slot: Rc<Cell<CursorSlot>>,
    id: CursorId,
    observers: Vec<(SubscriptionId, Box<dyn CursorObserver>)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("id", &self.id)
            .field("pos", &self.slot.get().pos)
            .field("desired_column", &self.desired_column())
            .finish()
    }
}

impl Cursor {
    /// New cursor at (1, 1), registered with `document`.
    pub fn new(document: &SharedDocument) -> Result<Self> {
        let slot = Rc::new(Cell::new(CursorSlot {
            pos: Position::new(1, 1),
            desired_column: 1,
            displaced: false,
        }));
        let id = document
            .try_borrow_mut()
            .map_err(|_| DocumentError::ReentrantMutation)?
            .register_cursor(&slot);
        tracing::trace!(target: "text.cursor", cursor = id.0, "registered");
        Ok(Self {
            document: Rc::clone(document),
            slot,
            id,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Share `document` and attach a new cursor at (1, 1) to it. The shared
    /// handle is available through [`Cursor::document`].
    pub fn attach(mut document: TextDocument) -> Self {
        let slot = Rc::new(Cell::new(CursorSlot {
            pos: Position::new(1, 1),
            desired_column: 1,
            displaced: false,
        }));
        let id = document.register_cursor(&slot);
        Self {
            document: crate::share(document),
            slot,
            id,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn id(&self) -> CursorId {
        self.id
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Current position. If another cursor's edit moved this one, the
    /// position change is emitted here first.
    pub fn pos(&self) -> Position {
        let state = self.slot.get();
        if state.displaced {
            self.slot.set(CursorSlot {
                displaced: false,
                ..state
            });
            tracing::trace!(target: "text.cursor", cursor = self.id.0, line = state.pos.line, column = state.pos.column, "reclamped");
            self.notify(state.pos);
        }
        state.pos
    }

    pub fn line(&self) -> usize {
        self.pos().line
    }

    pub fn column(&self) -> usize {
        self.pos().column
    }

    pub fn desired_column(&self) -> usize {
        self.slot.get().desired_column
    }

    pub fn subscribe(&mut self, observer: impl CursorObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        before != self.observers.len()
    }

    fn read(&self) -> Option<Ref<'_, TextDocument>> {
        self.document.try_borrow().ok()
    }

    /// Run `f` against the document, failing if it is mutably borrowed.
    pub fn with_document<T>(&self, f: impl FnOnce(&TextDocument) -> T) -> Result<T> {
        let doc = self
            .document
            .try_borrow()
            .map_err(|_| DocumentError::ReentrantMutation)?;
        Ok(f(&*doc))
    }

    /// Run a mutation against the document. The borrow is released before
    /// this returns, so cursor notifications fired afterwards may read it.
    pub fn with_document_mut<T>(
        &self,
        f: impl FnOnce(&mut TextDocument) -> Result<T>,
    ) -> Result<T> {
        let mut doc = self
            .document
            .try_borrow_mut()
            .map_err(|_| DocumentError::ReentrantMutation)?;
        f(&mut *doc)
    }

    fn place(&mut self, pos: Position, desired_column: usize) {
        self.slot.set(CursorSlot {
            pos,
            desired_column,
            displaced: false,
        });
        tracing::trace!(target: "text.cursor", line = pos.line, column = pos.column, desired = desired_column, "moved");
        self.notify(pos);
    }

    fn notify(&self, pos: Position) {
        let event = CursorEvent::PositionChanged {
            line: pos.line,
            column: pos.column,
        };
        for (_, observer) in &self.observers {
            observer.on_cursor_event(&event);
        }
    }

    /// Move to the current position after the document re-clamped the slot,
    /// emitting the position change.
    fn settle(&mut self) {
        let state = self.slot.get();
        self.place(state.pos, state.desired_column);
    }

    // ---- navigation -----------------------------------------------------

    /// Jump to `pos`, clamping the column into the line. Fails for a line
    /// outside the document or column 0. Rebases the sticky column.
    pub fn to_pos(&mut self, pos: Position) -> bool {
        let Some(len) = self.read().and_then(|d| d.line_length(pos.line).ok()) else {
            return false;
        };
        if pos.column < 1 {
            return false;
        }
        let column = pos.column.min(len);
        self.place(Position::new(pos.line, column), column);
        true
    }

    /// Change line keeping the sticky column.
    pub fn to_line(&mut self, n: usize) -> bool {
        let Some(len) = self.read().and_then(|d| d.line_length(n).ok()) else {
            return false;
        };
        let desired = self.desired_column();
        self.place(Position::new(n, desired.min(len)), desired);
        true
    }

    pub fn to_line_next(&mut self) -> bool {
        self.to_adjacent_line(self.line() + 1)
    }

    pub fn to_line_prev(&mut self) -> bool {
        match self.line().checked_sub(1) {
            Some(target) => self.to_adjacent_line(target),
            None => false,
        }
    }

    fn to_adjacent_line(&mut self, target: usize) -> bool {
        let Some(len) = self.read().and_then(|d| d.line_length(target).ok()) else {
            return false;
        };
        let state = self.slot.get();
        let column = state.pos.column.max(state.desired_column).min(len);
        self.place(Position::new(target, column), state.desired_column);
        true
    }

    pub fn to_char_next(&mut self) -> bool {
        let pos = self.pos();
        let Some(len) = self.read().and_then(|d| d.line_length(pos.line).ok()) else {
            return false;
        };
        if pos.column >= len {
            return false;
        }
        self.place(Position::new(pos.line, pos.column + 1), pos.column + 1);
        true
    }

    pub fn to_char_prev(&mut self) -> bool {
        let pos = self.pos();
        if pos.column <= 1 {
            return false;
        }
        self.place(Position::new(pos.line, pos.column - 1), pos.column - 1);
        true
    }

    pub fn to_line_beginning(&mut self) -> bool {
        let line = self.line();
        self.to_pos(Position::new(line, 1))
    }

    /// Jump to the marker column of the current line.
    pub fn to_line_end(&mut self) -> bool {
        let line = self.line();
        let Some(len) = self.read().and_then(|d| d.line_length(line).ok()) else {
            return false;
        };
        self.place(Position::new(line, len), len);
        true
    }

    pub fn to_first_line(&mut self) -> bool {
        self.to_pos(Position::new(1, 1))
    }

    pub fn to_last_line(&mut self) -> bool {
        let Some(last) = self.read().map(|d| d.num_lines()) else {
            return false;
        };
        self.to_pos(Position::new(last, 1))
    }

    // ---- mutation -------------------------------------------------------

    /// Insert `c` at the cursor and advance past it.
    pub fn insert_single_char(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.insert_string(c.encode_utf8(&mut buf))
    }

    /// Insert `text` at the cursor and advance past it.
    pub fn insert_string(&mut self, text: &str) -> Result<()> {
        let pos = self.pos();
        self.with_document_mut(|d| d.insert_chars(pos, text))?;
        let column = pos.column + text.chars().count();
        self.place(Position::new(pos.line, column), column);
        Ok(())
    }

    /// Delete the character before the cursor, moving onto its column.
    /// Returns the removed text, empty at column 1.
    pub fn delete_single_char(&mut self) -> Result<String> {
        let pos = self.pos();
        if pos.column <= 1 {
            return Ok(String::new());
        }
        let at = Position::new(pos.line, pos.column - 1);
        let removed = self.with_document_mut(|d| d.delete_chars(at, 1))?;
        self.place(at, at.column);
        Ok(removed)
    }

    /// Delete the character under the cursor. On the marker the last
    /// content character is deleted instead.
    pub fn delete_single_char_after(&mut self) -> Result<String> {
        let pos = self.pos();
        let len = self.with_document(|d| d.line_length(pos.line))??;
        let at = if pos.column >= len && pos.column > 1 {
            Position::new(pos.line, len - 1)
        } else {
            pos
        };
        let removed = self.with_document_mut(|d| d.delete_chars(at, 1))?;
        if at != pos {
            self.place(at, at.column);
        }
        Ok(removed)
    }

    /// Split the line at the cursor and move to the start of the new line.
    pub fn break_line(&mut self) -> Result<()> {
        let pos = self.pos();
        self.with_document_mut(|d| d.break_line(pos))?;
        self.place(Position::new(pos.line + 1, 1), 1);
        Ok(())
    }

    /// Join the next line onto the current one. The cursor stays put.
    pub fn join_with_next_line(&mut self) -> Result<bool> {
        let line = self.line();
        self.with_document_mut(|d| d.join_with_next_line(line))
    }

    /// Open a blank line above and move onto it.
    pub fn new_line(&mut self) -> Result<()> {
        let line = self.line();
        self.with_document_mut(|d| d.new_line(line))?;
        self.place(Position::new(line, 1), 1);
        Ok(())
    }

    /// Open a blank line below and move onto it.
    pub fn new_line_after(&mut self) -> Result<()> {
        let line = self.line();
        self.with_document_mut(|d| d.new_line_after(line))?;
        self.place(Position::new(line + 1, 1), 1);
        Ok(())
    }

    /// Delete the cursor's line. On the last line of a multi-line document
    /// the cursor moves up first; otherwise it stays on the same line number
    /// and is re-clamped to the line that took its place.
    pub fn delete_line(&mut self) -> Result<String> {
        let line = self.line();
        let num_lines = self.with_document(|d| d.num_lines())?;
        if line == num_lines && num_lines > 1 {
            self.to_line_prev();
        }
        let removed = self.with_document_mut(|d| d.delete_line(line))?;
        self.settle();
        Ok(removed)
    }

    // ---- line annotations -----------------------------------------------

    pub fn line_meta(&self) -> Result<LineMeta> {
        let line = self.line();
        self.with_document(|d| d.line_meta(line).cloned())?
    }

    pub fn update_line_meta(&self, meta: LineMeta) -> Result<()> {
        let line = self.line();
        self.with_document_mut(|d| d.update_line_meta(line, meta))
    }

    pub fn delete_line_meta(&self, keys: &[&str]) -> Result<()> {
        let line = self.line();
        self.with_document_mut(|d| d.delete_line_meta(line, keys))
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        match self.document.try_borrow_mut() {
            Ok(mut doc) => doc.unregister_cursor(self.id),
            // The weak entry goes stale and is pruned on the next re-clamp.
            Err(_) => {
                tracing::warn!(target: "text.cursor", cursor = self.id.0, "document busy while dropping cursor")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share;
    use std::cell::RefCell;

    fn cursor_on(text: &str) -> (SharedDocument, Cursor) {
        let doc = share(TextDocument::from_text(text));
        let cursor = Cursor::new(&doc).unwrap();
        (doc, cursor)
    }

    fn p(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn to_pos_clamps_and_validates() {
        let (_doc, mut c) = cursor_on("hello\nhow are you?\n");
        assert!(c.to_pos(p(1, 30)));
        assert_eq!(c.pos(), p(1, 6));
        assert_eq!(c.desired_column(), 6);
        assert!(!c.to_pos(p(3, 1)));
        assert!(!c.to_pos(p(0, 1)));
        assert!(!c.to_pos(p(2, 0)));
        assert_eq!(c.pos(), p(1, 6));
    }

    #[test]
    fn sticky_column_survives_short_line() {
        let (_doc, mut c) = cursor_on("long line here\nab\nanother long one\n");
        assert!(c.to_pos(p(1, 4)));
        assert!(c.to_line_next());
        assert_eq!(c.pos(), p(2, 3));
        assert!(c.to_line_next());
        assert_eq!(c.pos(), p(3, 4));
        assert!(!c.to_line_next());
        assert!(c.to_line_prev());
        assert!(c.to_line_prev());
        assert_eq!(c.pos(), p(1, 4));
        assert!(!c.to_line_prev());
    }

    #[test]
    fn horizontal_moves_rebase_desired_column() {
        let (_doc, mut c) = cursor_on("abcdef\nab\nabcdef\n");
        c.to_pos(p(1, 5));
        c.to_line_next();
        assert!(c.to_char_prev());
        assert_eq!(c.desired_column(), 2);
        c.to_line_next();
        assert_eq!(c.pos(), p(3, 2));
        assert!(c.to_line_end());
        assert_eq!(c.pos(), p(3, 7));
        assert!(!c.to_char_next());
    }

    #[test]
    fn jump_helpers() {
        let (_doc, mut c) = cursor_on("a\nbb\nccc\n");
        assert!(c.to_last_line());
        assert_eq!(c.pos(), p(3, 1));
        assert!(c.to_line_end());
        assert_eq!(c.pos(), p(3, 4));
        assert!(c.to_line_beginning());
        assert_eq!(c.pos(), p(3, 1));
        assert!(c.to_first_line());
        assert_eq!(c.pos(), p(1, 1));
    }

    #[test]
    fn insert_and_delete_chars_move_cursor() {
        let (doc, mut c) = cursor_on("hllo\n");
        c.to_pos(p(1, 2));
        c.insert_single_char('e').unwrap();
        assert_eq!(c.pos(), p(1, 3));
        assert_eq!(doc.borrow().line_text(1).unwrap(), "hello\n");

        assert_eq!(c.delete_single_char().unwrap(), "e");
        assert_eq!(c.pos(), p(1, 2));
        c.to_line_beginning();
        assert_eq!(c.delete_single_char().unwrap(), "");
        assert_eq!(doc.borrow().line_text(1).unwrap(), "hllo\n");
    }

    #[test]
    fn delete_after_on_marker_takes_last_char() {
        let (doc, mut c) = cursor_on("abc\n");
        c.to_line_end();
        assert_eq!(c.delete_single_char_after().unwrap(), "c");
        assert_eq!(c.pos(), p(1, 3));
        assert_eq!(doc.borrow().line_text(1).unwrap(), "ab\n");
        c.to_line_beginning();
        assert_eq!(c.delete_single_char_after().unwrap(), "a");
        assert_eq!(c.pos(), p(1, 1));
    }

    #[test]
    fn delete_last_line_moves_up() {
        let (doc, mut c) = cursor_on("one\ntwo\nthree\n");
        c.to_pos(p(3, 4));
        assert_eq!(c.delete_line().unwrap(), "three\n");
        assert_eq!(c.line(), 2);
        assert_eq!(doc.borrow().num_lines(), 2);

        c.to_pos(p(1, 4));
        c.delete_line().unwrap();
        assert_eq!(c.pos(), p(1, 4));
        assert_eq!(doc.borrow().document_text(), "two\n");
    }

    #[test]
    fn break_and_join_round_trip() {
        let (doc, mut c) = cursor_on("hello world\n");
        c.to_pos(p(1, 6));
        c.break_line().unwrap();
        assert_eq!(c.pos(), p(2, 1));
        c.to_line_prev();
        assert!(c.join_with_next_line().unwrap());
        assert_eq!(doc.borrow().document_text(), "hello world\n");
        assert!(!c.join_with_next_line().unwrap());
    }

    #[test]
    fn other_cursors_are_reclamped_on_shrink() {
        let (doc, mut c) = cursor_on("abcdef\nxyz\n");
        let mut other = Cursor::new(&doc).unwrap();
        other.to_pos(p(2, 3));
        c.to_pos(p(1, 1));
        assert_eq!(doc.borrow().cursor_count(), 2);
        c.delete_line().unwrap();
        c.delete_line().unwrap();
        assert_eq!(other.pos(), p(1, 1));
        drop(other);
        assert_eq!(doc.borrow().cursor_count(), 1);
    }

    #[test]
    fn displaced_cursor_announces_its_new_position_once() {
        let (_doc, mut c) = cursor_on("one\ntwo\nthree\n");
        let mut other = Cursor::new(c.document()).unwrap();
        other.to_pos(p(3, 5));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        other.subscribe(move |e: &CursorEvent| sink.borrow_mut().push(*e));

        c.to_pos(p(3, 1));
        c.delete_line().unwrap();
        assert!(seen.borrow().is_empty());

        assert_eq!(other.pos(), p(2, 4));
        assert_eq!(other.pos(), p(2, 4));
        assert_eq!(
            *seen.borrow(),
            vec![CursorEvent::PositionChanged { line: 2, column: 4 }]
        );
    }

    #[test]
    fn position_events_are_emitted() {
        let (_doc, mut c) = cursor_on("ab\ncd\n");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        c.subscribe(move |e: &CursorEvent| sink.borrow_mut().push(*e));
        c.to_line_next();
        assert!(!c.to_line_next());
        assert_eq!(
            *seen.borrow(),
            vec![CursorEvent::PositionChanged { line: 2, column: 1 }]
        );
    }

    #[test]
    fn mutation_from_notification_is_refused() {
        let doc = share(TextDocument::from_text("ab\n"));
        let refused = Rc::new(RefCell::new(None));
        let inner_doc = Rc::clone(&doc);
        let result = Rc::clone(&refused);
        doc.borrow_mut()
            .subscribe(move |_: &TextDocument, _: &core_events::DocumentEvent| {
                let outcome = inner_doc.try_borrow_mut().is_err();
                *result.borrow_mut() = Some(outcome);
            });
        let mut c = Cursor::new(&doc).unwrap();
        c.insert_single_char('x').unwrap();
        assert_eq!(*refused.borrow(), Some(true));
    }

    #[test]
    fn line_meta_helpers_target_cursor_line() {
        use crate::meta::{ChangeKind, keys};
        let (doc, mut c) = cursor_on("a\nb\n");
        c.to_line_next();
        let mut meta = LineMeta::new();
        meta.insert(keys::CHANGE.into(), ChangeKind::Added.into());
        c.update_line_meta(meta).unwrap();
        assert_eq!(doc.borrow().line(2).unwrap().change(), Some(ChangeKind::Added));
        c.delete_line_meta(&[keys::CHANGE]).unwrap();
        assert!(c.line_meta().unwrap().is_empty());
    }
}
