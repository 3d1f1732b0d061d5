//! Annotation values attached to documents, lines and characters.
//!
//! Annotations are keyed by string so collaborators (linters, highlighters,
//! change tracking) can add their own without touching this crate. The keys
//! the editing core itself reads are listed in [`keys`].

use std::collections::BTreeMap;
use std::fmt;

/// Well-known annotation keys.
pub mod keys {
    /// Line change tracking, value is [`super::MetaValue::Change`].
    pub const CHANGE: &str = "Change";
    /// Linter diagnostic for the line, value is [`super::MetaValue::Lint`].
    pub const LINTER_RESULT: &str = "LinterResult";
}

/// Change state of a line since the document was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LintLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterResult {
    pub level: LintLevel,
    pub message: String,
}

impl LinterResult {
    pub fn new(level: LintLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Value stored under an annotation key.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Change(ChangeKind),
    Lint(LinterResult),
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl MetaValue {
    pub fn as_change(&self) -> Option<ChangeKind> {
        match self {
            MetaValue::Change(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_lint(&self) -> Option<&LinterResult> {
        match self {
            MetaValue::Lint(lint) => Some(lint),
            _ => None,
        }
    }
}

impl From<ChangeKind> for MetaValue {
    fn from(kind: ChangeKind) -> Self {
        MetaValue::Change(kind)
    }
}

impl From<LinterResult> for MetaValue {
    fn from(lint: LinterResult) -> Self {
        MetaValue::Lint(lint)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Integer(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Flag(v)
    }
}

/// Free-form document level annotations.
pub type DocumentMeta = BTreeMap<String, MetaValue>;

/// Per-line annotations.
pub type LineMeta = BTreeMap<String, MetaValue>;

/// Per-character annotations of one line: every array is positional and has
/// exactly the line's length (end-of-line marker included).
pub type CharMeta = BTreeMap<String, Vec<Option<MetaValue>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_strings() {
        assert_eq!(ChangeKind::Added.as_str(), "added");
        assert_eq!(ChangeKind::Modified.to_string(), "modified");
    }

    #[test]
    fn accessors_match_variant() {
        let v = MetaValue::from(ChangeKind::Modified);
        assert_eq!(v.as_change(), Some(ChangeKind::Modified));
        assert!(v.as_lint().is_none());

        let lint = MetaValue::from(LinterResult::new(LintLevel::Warning, "unused import"));
        assert_eq!(lint.as_lint().map(|l| l.level), Some(LintLevel::Warning));
        assert!(lint.as_change().is_none());
    }

    #[test]
    fn lint_levels_order_by_severity() {
        assert!(LintLevel::Error > LintLevel::Warning);
        assert!(LintLevel::Warning > LintLevel::Info);
    }
}
