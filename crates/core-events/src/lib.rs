//! Core event types for vedit.
//!
//! Two families live here:
//! * Input: the abstract `KeyEvent` the modal dispatcher consumes. Producers
//!   (terminal adapters, scripted replays, tests) normalize whatever they read
//!   into this shape; nothing in the core depends on a terminal library.
//! * Notifications: `DocumentEvent` and `CursorEvent`, delivered synchronously
//!   to registered observers from inside the mutation that caused them.
//!
//! Observers receive events by shared reference. The document observer trait
//! lives next to the document in `core-text`, since it is handed a read-only
//! view of the document it watches.

use std::fmt;

/// Normalized key press.
///
/// `code` is the logical key identity. Letters are reported as they were typed
/// (`Char('J')` for a shifted `j`); `KeyEvent::base_char` folds the case back
/// and `KeyEvent::is_shifted` reports the shift state from either source. `text`
/// carries the literal payload to insert when it differs from the key identity
/// (e.g. an IME commit); when absent the printable character of `code` is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// KeyCode enumerates normalized logical key representations consumed by higher layers.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            text: None,
        }
    }

    /// Unmodified named or character key.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Printable character key. Uppercase letters imply `SHIFT`.
    pub fn char(c: char) -> Self {
        let mods = if c.is_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        Self::new(KeyCode::Char(c), mods)
    }

    /// Attach an explicit literal payload.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_shifted(&self) -> bool {
        if self.mods.contains(KeyModifiers::SHIFT) {
            return true;
        }
        matches!(self.code, KeyCode::Char(c) if c.is_uppercase())
    }

    pub fn is_ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    /// Lowercase identity of a character key, used by the key tables.
    pub fn base_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c.to_lowercase().next().unwrap_or(c)),
            _ => None,
        }
    }

    /// True for keys that every mode routes to pure navigation.
    pub fn is_directional(&self) -> bool {
        matches!(
            self.code,
            KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::PageUp
                | KeyCode::PageDown
        )
    }

    /// Literal text this key would insert, if any.
    ///
    /// An explicit payload wins; otherwise a character key yields itself with
    /// shift applied. Control chords never produce text.
    pub fn printable_text(&self) -> Option<String> {
        if self.is_ctrl() {
            return None;
        }
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        match self.code {
            KeyCode::Char(c) if self.mods.contains(KeyModifiers::SHIFT) => {
                Some(c.to_uppercase().collect())
            }
            KeyCode::Char(c) => Some(c.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Notification emitted by a document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Text or line structure changed.
    ContentChanged,
    /// Per-line annotations of `line` (1-based) changed.
    LineMetaChanged { line: usize },
}

/// Notification emitted by a cursor after it moved itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEvent {
    PositionChanged { line: usize, column: usize },
}

pub trait CursorObserver {
    fn on_cursor_event(&self, event: &CursorEvent);
}

impl<F> CursorObserver for F
where
    F: Fn(&CursorEvent),
{
    fn on_cursor_event(&self, event: &CursorEvent) {
        self(event)
    }
}
