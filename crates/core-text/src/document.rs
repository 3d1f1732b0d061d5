//! Line-oriented document store.
//!
//! `TextDocument` owns the line sequence and every annotation layer. All
//! public line numbers and columns are 1-based. A document always holds at
//! least one line and every line ends with the [`EOL`] marker, so the
//! column equal to a line's length is the append point.
//!
//! Content mutations set the modified latch, refresh `last_modified`,
//! re-clamp registered cursors and then notify observers with
//! [`DocumentEvent::ContentChanged`]. Line annotation changes notify with
//! [`DocumentEvent::LineMetaChanged`] and leave the modified state alone.
//! Observers get a shared view of the document with each event, so they can
//! read what changed but cannot edit from inside the notification.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::time::SystemTime;

use core_events::DocumentEvent;

use crate::cursor::CursorSlot;
use crate::error::{DocumentError, Result};
use crate::line::Line;
use crate::line_ending::{EOL, LineEnding, normalize_line_endings};
use crate::meta::{CharMeta, DocumentMeta, LineMeta};
use crate::{CursorId, Position, SubscriptionId};

/// Receives change notifications together with the document that emitted them.
pub trait DocumentObserver {
    fn on_document_event(&self, doc: &TextDocument, event: &DocumentEvent);
}

impl<F> DocumentObserver for F
where
    F: Fn(&TextDocument, &DocumentEvent),
{
    fn on_document_event(&self, doc: &TextDocument, event: &DocumentEvent) {
        self(doc, event)
    }
}

pub struct TextDocument {
    lines: Vec<Line>,
    document_meta: DocumentMeta,
    filename: Option<PathBuf>,
    modified: bool,
    last_modified: SystemTime,
    line_ending: LineEnding,
    cursors: BTreeMap<CursorId, Weak<Cell<CursorSlot>>>,
    next_cursor: u64,
    observers: Vec<(SubscriptionId, Box<dyn DocumentObserver>)>,
    next_subscription: u64,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextDocument")
            .field("lines", &self.lines.len())
            .field("filename", &self.filename)
            .field("modified", &self.modified)
            .field("cursors", &self.cursors.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TextDocument {
    /// Empty document: one line holding only the marker.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::blank()],
            document_meta: DocumentMeta::new(),
            filename: None,
            modified: false,
            last_modified: SystemTime::now(),
            line_ending: LineEnding::Lf,
            cursors: BTreeMap::new(),
            next_cursor: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Document holding `text`. A missing final marker is added.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.load(text);
        doc
    }

    /// Read `path` into a new document whose filename is `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut doc = Self::new();
        doc.read(file)?;
        doc.filename = Some(path.to_path_buf());
        tracing::debug!(target: "text.document", path = %path.display(), lines = doc.num_lines(), "opened");
        Ok(doc)
    }

    /// Replace the content with everything `reader` yields.
    pub fn read<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        self.load(&raw);
        self.reclamp_cursors();
        self.emit(DocumentEvent::ContentChanged);
        Ok(())
    }

    fn load(&mut self, raw: &str) {
        let normalized = normalize_line_endings(raw);
        if normalized.mixed {
            tracing::debug!(target: "text.document", dominant = ?normalized.original, "mixed line endings normalized");
        }
        self.line_ending = normalized.original;
        self.lines = normalized
            .normalized
            .split_inclusive(EOL)
            .map(Line::from_text)
            .collect();
        if self.lines.is_empty() {
            self.lines.push(Line::blank());
        }
    }

    /// Emit the normalized text.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for line in &self.lines {
            writer.write_all(line.text().as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.filename.clone() else {
            return Err(DocumentError::MissingDestination);
        };
        let file = File::create(&path)?;
        self.write(BufWriter::new(file))?;
        tracing::debug!(target: "text.document", path = %path.display(), lines = self.num_lines(), "saved");
        Ok(())
    }

    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.filename = Some(path.into());
        self.save()
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, path: Option<PathBuf>) {
        self.filename = path;
    }

    /// Line terminator style detected in the last loaded source.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn document_text(&self) -> String {
        self.lines.iter().map(Line::text).collect()
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].content().is_empty()
    }

    pub fn has_line(&self, n: usize) -> bool {
        (1..=self.lines.len()).contains(&n)
    }

    pub fn line(&self, n: usize) -> Result<&Line> {
        self.check_line(n)?;
        Ok(&self.lines[n - 1])
    }

    /// Text of line `n`, marker included.
    pub fn line_text(&self, n: usize) -> Result<&str> {
        Ok(self.line(n)?.text())
    }

    pub fn line_length(&self, n: usize) -> Result<usize> {
        Ok(self.line(n)?.len())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    // ---- line structure -------------------------------------------------

    /// Insert `text` as a new line before line `n`; `n == num_lines() + 1`
    /// appends.
    pub fn insert_line(&mut self, n: usize, text: &str) -> Result<()> {
        self.check_insert_target(n)?;
        check_single_line(text.strip_suffix(EOL).unwrap_or(text))?;
        self.lines.insert(n - 1, Line::from_text(text));
        tracing::trace!(target: "text.document", line = n, len = text.len(), "insert_line");
        self.content_changed();
        Ok(())
    }

    /// Remove line `n` and return its text. Removing the sole line leaves a
    /// blank line behind.
    pub fn delete_line(&mut self, n: usize) -> Result<String> {
        self.check_line(n)?;
        let removed = self.lines.remove(n - 1);
        if self.lines.is_empty() {
            self.lines.push(Line::blank());
        }
        tracing::trace!(target: "text.document", line = n, remaining = self.lines.len(), "delete_line");
        self.content_changed();
        Ok(removed.text().to_string())
    }

    /// Overwrite the text of line `n`. Line annotations are kept; character
    /// annotation keys are kept with every entry reset.
    pub fn replace_line(&mut self, n: usize, text: &str) -> Result<()> {
        self.check_line(n)?;
        check_single_line(text.strip_suffix(EOL).unwrap_or(text))?;
        self.lines[n - 1].set_text(text);
        tracing::trace!(target: "text.document", line = n, "replace_line");
        self.content_changed();
        Ok(())
    }

    /// Insert a blank line at position `n`, pushing line `n` and its
    /// followers down.
    pub fn new_line(&mut self, n: usize) -> Result<()> {
        self.check_insert_target(n)?;
        self.lines.insert(n - 1, Line::blank());
        tracing::trace!(target: "text.document", line = n, "new_line");
        self.content_changed();
        Ok(())
    }

    /// Insert a blank line right after line `n`.
    pub fn new_line_after(&mut self, n: usize) -> Result<()> {
        self.check_line(n)?;
        self.lines.insert(n, Line::blank());
        tracing::trace!(target: "text.document", line = n + 1, "new_line_after");
        self.content_changed();
        Ok(())
    }

    /// Split the line at `pos`; text from `pos.column` onward moves to a new
    /// following line.
    pub fn break_line(&mut self, pos: Position) -> Result<()> {
        self.check_pos(pos)?;
        let tail = self.lines[pos.line - 1].split_off(pos.column);
        self.lines.insert(pos.line, tail);
        tracing::trace!(target: "text.document", line = pos.line, column = pos.column, "break_line");
        self.content_changed();
        Ok(())
    }

    /// Append line `n + 1` to line `n`. Returns `false` without touching the
    /// document when `n` is the last line.
    pub fn join_with_next_line(&mut self, n: usize) -> Result<bool> {
        self.check_line(n)?;
        if n == self.lines.len() {
            return Ok(false);
        }
        let next = self.lines.remove(n);
        self.lines[n - 1].join(next);
        tracing::trace!(target: "text.document", line = n, "join_with_next_line");
        self.content_changed();
        Ok(true)
    }

    // ---- in-line edits --------------------------------------------------

    /// Insert `text` before `pos`. `text` must not contain the marker.
    pub fn insert_chars(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_pos(pos)?;
        check_single_line(text)?;
        if text.is_empty() {
            return Ok(());
        }
        self.lines[pos.line - 1].insert(pos.column, text);
        tracing::trace!(target: "text.document", line = pos.line, column = pos.column, chars = text.chars().count(), "insert_chars");
        self.content_changed();
        Ok(())
    }

    /// Delete up to `count` characters from `pos`, stopping before the
    /// marker. Returns exactly what was removed.
    pub fn delete_chars(&mut self, pos: Position, count: usize) -> Result<String> {
        self.check_pos(pos)?;
        let removed = self.lines[pos.line - 1].remove(pos.column, count);
        if !removed.is_empty() {
            tracing::trace!(target: "text.document", line = pos.line, column = pos.column, chars = removed.chars().count(), "delete_chars");
            self.content_changed();
        }
        Ok(removed)
    }

    /// Delete `count` characters at `pos` and insert `text` in their place.
    /// Returns the removed text.
    pub fn replace_chars(&mut self, pos: Position, count: usize, text: &str) -> Result<String> {
        self.check_pos(pos)?;
        check_single_line(text)?;
        let line = &mut self.lines[pos.line - 1];
        let removed = line.remove(pos.column, count);
        line.insert(pos.column, text);
        tracing::trace!(target: "text.document", line = pos.line, column = pos.column, removed = removed.chars().count(), inserted = text.chars().count(), "replace_chars");
        self.content_changed();
        Ok(removed)
    }

    /// Whitespace-delimited token containing `pos` and the column it starts
    /// at. On whitespace (or the marker) the token is empty and starts at
    /// `pos.column`.
    pub fn word_at(&self, pos: Position) -> Result<(String, usize)> {
        self.check_pos(pos)?;
        let chars: Vec<char> = self.lines[pos.line - 1].text().chars().collect();
        let idx = pos.column - 1;
        if chars[idx].is_whitespace() {
            return Ok((String::new(), pos.column));
        }
        let start = chars[..idx]
            .iter()
            .rposition(|c| c.is_whitespace())
            .map_or(0, |i| i + 1);
        let end = chars[idx..]
            .iter()
            .position(|c| c.is_whitespace())
            .map_or(chars.len(), |i| idx + i);
        Ok((chars[start..end].iter().collect(), start + 1))
    }

    // ---- whole-line snapshots -------------------------------------------

    /// Copy of line `n` with all of its annotations.
    pub fn line_snapshot(&self, n: usize) -> Result<Line> {
        Ok(self.line(n)?.clone())
    }

    /// Put a previously taken snapshot back in place of line `n`.
    pub fn restore_line(&mut self, n: usize, line: Line) -> Result<()> {
        self.check_line(n)?;
        self.lines[n - 1] = line;
        tracing::trace!(target: "text.document", line = n, "restore_line");
        self.content_changed();
        Ok(())
    }

    /// Insert a previously taken snapshot before line `n`.
    pub fn insert_line_snapshot(&mut self, n: usize, line: Line) -> Result<()> {
        self.check_insert_target(n)?;
        self.lines.insert(n - 1, line);
        tracing::trace!(target: "text.document", line = n, "insert_line_snapshot");
        self.content_changed();
        Ok(())
    }

    // ---- annotations ----------------------------------------------------

    pub fn document_meta(&self) -> &DocumentMeta {
        &self.document_meta
    }

    pub fn update_document_meta(&mut self, meta: DocumentMeta) {
        self.document_meta.extend(meta);
    }

    pub fn delete_document_meta(&mut self, keys: &[&str]) {
        for key in keys {
            self.document_meta.remove(*key);
        }
    }

    pub fn line_meta(&self, n: usize) -> Result<&LineMeta> {
        Ok(self.line(n)?.meta())
    }

    /// Merge `meta` into the annotations of line `n`.
    pub fn update_line_meta(&mut self, n: usize, meta: LineMeta) -> Result<()> {
        self.check_line(n)?;
        self.lines[n - 1].meta_mut().extend(meta);
        self.emit(DocumentEvent::LineMetaChanged { line: n });
        Ok(())
    }

    pub fn delete_line_meta(&mut self, n: usize, keys: &[&str]) -> Result<()> {
        self.check_line(n)?;
        let meta = self.lines[n - 1].meta_mut();
        for key in keys {
            meta.remove(*key);
        }
        self.emit(DocumentEvent::LineMetaChanged { line: n });
        Ok(())
    }

    /// Character annotations of `pos.line` from `pos.column` to the end of
    /// the line, per key.
    pub fn char_meta(&self, pos: Position) -> Result<CharMeta> {
        self.check_pos(pos)?;
        Ok(self.lines[pos.line - 1]
            .char_meta()
            .iter()
            .map(|(key, entries)| (key.clone(), entries[pos.column - 1..].to_vec()))
            .collect())
    }

    /// Write `meta` values starting at `pos`. Missing keys are created at the
    /// line's length; values past the end of the line are dropped.
    pub fn update_char_meta(&mut self, pos: Position, meta: CharMeta) -> Result<()> {
        self.check_pos(pos)?;
        let line = &mut self.lines[pos.line - 1];
        let len = line.len();
        let start = pos.column - 1;
        for (key, values) in meta {
            let entries = line
                .char_meta_mut()
                .entry(key)
                .or_insert_with(|| vec![None; len]);
            for (slot, value) in entries[start..].iter_mut().zip(values) {
                *slot = value;
            }
        }
        Ok(())
    }

    /// Clear `count` entries of each of `keys` starting at `pos`.
    pub fn delete_char_meta(&mut self, pos: Position, count: usize, keys: &[&str]) -> Result<()> {
        self.check_pos(pos)?;
        let start = pos.column - 1;
        let line = &mut self.lines[pos.line - 1];
        let end = start.saturating_add(count).min(line.len());
        for key in keys {
            if let Some(entries) = line.char_meta_mut().get_mut(*key) {
                entries[start..end].iter_mut().for_each(|e| *e = None);
            }
        }
        Ok(())
    }

    // ---- observers ------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl DocumentObserver + 'static) -> SubscriptionId {
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

    fn emit(&self, event: DocumentEvent) {
        for (_, observer) in &self.observers {
            observer.on_document_event(self, &event);
        }
    }

    // ---- cursor registry ------------------------------------------------

    pub(crate) fn register_cursor(&mut self, slot: &Rc<Cell<CursorSlot>>) -> CursorId {
        let id = CursorId(self.next_cursor);
        self.next_cursor += 1;
        self.cursors.insert(id, Rc::downgrade(slot));
        id
    }

    pub(crate) fn unregister_cursor(&mut self, id: CursorId) {
        self.cursors.remove(&id);
    }

    /// Number of live registered cursors.
    pub fn cursor_count(&self) -> usize {
        self.cursors.values().filter(|w| w.strong_count() > 0).count()
    }

    /// Pull every registered cursor back inside the document.
    fn reclamp_cursors(&mut self) {
        let num_lines = self.lines.len();
        let lines = &self.lines;
        self.cursors.retain(|id, weak| {
            let Some(slot) = weak.upgrade() else {
                tracing::trace!(target: "text.document", cursor = id.0, "dropping stale cursor entry");
                return false;
            };
            let mut state = slot.get();
            let line = state.pos.line.clamp(1, num_lines);
            let column = state.pos.column.clamp(1, lines[line - 1].len());
            if (line, column) != (state.pos.line, state.pos.column) {
                state.pos = Position::new(line, column);
                state.displaced = true;
                slot.set(state);
            }
            true
        });
    }

    fn content_changed(&mut self) {
        self.modified = true;
        self.last_modified = SystemTime::now();
        self.reclamp_cursors();
        self.emit(DocumentEvent::ContentChanged);
    }

    // ---- bounds ---------------------------------------------------------

    fn check_line(&self, n: usize) -> Result<()> {
        if self.has_line(n) {
            Ok(())
        } else {
            Err(DocumentError::line(n, self.lines.len()))
        }
    }

    fn check_insert_target(&self, n: usize) -> Result<()> {
        let max = self.lines.len() + 1;
        if (1..=max).contains(&n) {
            Ok(())
        } else {
            Err(DocumentError::line(n, max))
        }
    }

    fn check_pos(&self, pos: Position) -> Result<()> {
        self.check_line(pos.line)?;
        let len = self.lines[pos.line - 1].len();
        if (1..=len).contains(&pos.column) {
            Ok(())
        } else {
            Err(DocumentError::column(pos.column, len))
        }
    }
}

fn check_single_line(text: &str) -> Result<()> {
    if text.contains(EOL) || text.contains('\r') {
        return Err(DocumentError::InvalidArgument(
            "text must not contain a line terminator".to_string(),
        ));
    }
    Ok(())
}
