//! A single document line with its annotations.
//!
//! Columns are 1-based and count Unicode scalar values. The trailing
//! end-of-line marker is part of the text and occupies the last column, so a
//! line's length is never zero. Every `char_meta` array is kept exactly as long
//! as the line; the helpers here are the only place that resizes them.

use crate::line_ending::{EOL, with_eol, without_eol};
use crate::meta::{CharMeta, ChangeKind, LineMeta, MetaValue, keys};

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    text: String,
    meta: LineMeta,
    char_meta: CharMeta,
}

impl Default for Line {
    fn default() -> Self {
        Self::blank()
    }
}

impl Line {
    /// A line holding only the end-of-line marker.
    pub fn blank() -> Self {
        Self {
            text: EOL.to_string(),
            meta: LineMeta::new(),
            char_meta: CharMeta::new(),
        }
    }

    /// Build a line from text with or without its trailing marker.
    /// Callers guarantee `text` holds no interior marker.
    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            text: with_eol(text),
            meta: LineMeta::new(),
            char_meta: CharMeta::new(),
        }
    }

    /// Text including the trailing marker.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text without the trailing marker.
    pub fn content(&self) -> &str {
        without_eol(&self.text)
    }

    /// Length in characters, marker included.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Characters before the marker.
    pub fn content_len(&self) -> usize {
        self.len() - 1
    }

    pub fn meta(&self) -> &LineMeta {
        &self.meta
    }

    pub fn char_meta(&self) -> &CharMeta {
        &self.char_meta
    }

    pub fn change(&self) -> Option<ChangeKind> {
        self.meta.get(keys::CHANGE).and_then(MetaValue::as_change)
    }

    pub(crate) fn meta_mut(&mut self) -> &mut LineMeta {
        &mut self.meta
    }

    pub(crate) fn char_meta_mut(&mut self) -> &mut CharMeta {
        &mut self.char_meta
    }

    /// Replace the text, keeping the annotation keys but resetting every
    /// character entry to empty at the new length.
    pub(crate) fn set_text(&mut self, text: &str) {
        self.text = with_eol(text);
        let len = self.len();
        for entries in self.char_meta.values_mut() {
            entries.clear();
            entries.resize(len, None);
        }
    }

    /// Insert `fragment` before column `column` (1-based, marker column allowed).
    pub(crate) fn insert(&mut self, column: usize, fragment: &str) {
        let at = byte_offset(&self.text, column);
        self.text.insert_str(at, fragment);
        let added = fragment.chars().count();
        for entries in self.char_meta.values_mut() {
            let idx = column - 1;
            entries.splice(idx..idx, std::iter::repeat_n(None, added));
        }
    }

    /// Remove up to `count` characters starting at `column`, never touching the
    /// marker. Returns the removed text.
    pub(crate) fn remove(&mut self, column: usize, count: usize) -> String {
        let available = self.content_len().saturating_sub(column - 1);
        let count = count.min(available);
        if count == 0 {
            return String::new();
        }
        let start = byte_offset(&self.text, column);
        let end = byte_offset(&self.text, column + count);
        let removed: String = self.text.drain(start..end).collect();
        for entries in self.char_meta.values_mut() {
            let idx = column - 1;
            entries.drain(idx..idx + count);
        }
        removed
    }

    /// Split before `column`; `self` keeps the head plus a fresh marker and the
    /// returned line receives the tail (including the old marker).
    pub(crate) fn split_off(&mut self, column: usize) -> Line {
        let at = byte_offset(&self.text, column);
        let tail_text = self.text.split_off(at);
        self.text.push(EOL);
        let mut tail_meta = CharMeta::new();
        for (key, entries) in self.char_meta.iter_mut() {
            let tail = entries.split_off(column - 1);
            entries.push(None);
            tail_meta.insert(key.clone(), tail);
        }
        Line {
            text: tail_text,
            meta: LineMeta::new(),
            char_meta: tail_meta,
        }
    }

    /// Append `next` after this line's content; this line's marker is dropped
    /// and `next`'s marker terminates the result. Line annotations of `next`
    /// are discarded; character annotations are concatenated.
    pub(crate) fn join(&mut self, next: Line) {
        let head_len = self.content_len();
        let tail_len = next.len();
        self.text.pop();
        self.text.push_str(&next.text);

        for entries in self.char_meta.values_mut() {
            entries.pop();
        }
        let mut tail_meta = next.char_meta;
        for key in self.char_meta.keys().cloned().collect::<Vec<_>>() {
            tail_meta.entry(key).or_insert_with(|| vec![None; tail_len]);
        }
        for (key, tail) in tail_meta {
            let entries = self
                .char_meta
                .entry(key)
                .or_insert_with(|| vec![None; head_len]);
            entries.extend(tail);
        }
    }
}

/// Byte index of 1-based `column` in `text`; one past the end maps to `text.len()`.
pub(crate) fn byte_offset(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
