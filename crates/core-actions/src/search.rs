//! Pattern search over a document.
//!
//! Patterns are regular expressions matched against each line's content
//! (the end-of-line marker excluded), so a match never spans lines. A
//! pattern that does not compile is searched literally. Columns are
//! 1-based character columns like every other position in the document.

use core_text::{Position, TextDocument};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
    literal: bool,
}

impl SearchPattern {
    /// Compile `pattern`; `None` for an empty pattern.
    pub fn new(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }
        match Regex::new(pattern) {
            Ok(regex) => Some(Self {
                regex,
                literal: false,
            }),
            Err(err) => {
                tracing::debug!(target: "actions.dispatch", error = %err, "search_pattern_literal");
                Regex::new(&regex::escape(pattern))
                    .ok()
                    .map(|regex| Self {
                        regex,
                        literal: true,
                    })
            }
        }
    }

    /// True when the pattern failed to compile and is matched literally.
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Start columns of every match on `content`, in order.
    fn columns(&self, content: &str) -> Vec<usize> {
        self.regex
            .find_iter(content)
            .map(|m| content[..m.start()].chars().count() + 1)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub pos: Position,
    /// The search ran past the end (or start) of the document.
    pub wrapped: bool,
}

/// Find the next match strictly after `from` (or strictly before it when
/// `forward` is false), wrapping around the document. The match at `from`
/// itself is found last, once every other line has been tried.
pub fn find(
    doc: &TextDocument,
    pattern: &SearchPattern,
    from: Position,
    forward: bool,
) -> Option<SearchHit> {
    let num_lines = doc.num_lines();
    let start = from.line.clamp(1, num_lines);
    let columns_on = |n: usize| {
        doc.line(n)
            .map(|line| pattern.columns(line.content()))
            .unwrap_or_default()
    };

    let here = columns_on(start);
    let first = if forward {
        here.iter().copied().find(|c| *c > from.column)
    } else {
        here.iter().copied().rev().find(|c| *c < from.column)
    };
    if let Some(column) = first {
        return Some(SearchHit {
            pos: Position::new(start, column),
            wrapped: false,
        });
    }

    for step in 1..num_lines {
        let (line, wrapped) = if forward {
            let n = start + step;
            if n > num_lines {
                (n - num_lines, true)
            } else {
                (n, false)
            }
        } else if step < start {
            (start - step, false)
        } else {
            (start + num_lines - step, true)
        };
        let columns = columns_on(line);
        let column = if forward {
            columns.first()
        } else {
            columns.last()
        };
        if let Some(&column) = column {
            return Some(SearchHit {
                pos: Position::new(line, column),
                wrapped,
            });
        }
    }

    let last = if forward {
        here.iter().copied().find(|c| *c <= from.column)
    } else {
        here.iter().copied().rev().find(|c| *c >= from.column)
    };
    last.map(|column| SearchHit {
        pos: Position::new(start, column),
        wrapped: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> TextDocument {
        TextDocument::from_text("alpha beta\ngamma\nbeta alpha\n")
    }

    fn search(text: &str, from: Position, forward: bool) -> Option<SearchHit> {
        let pattern = SearchPattern::new(text).unwrap();
        find(&doc(), &pattern, from, forward)
    }

    #[test]
    fn forward_finds_later_match_on_same_line() {
        let hit = search("beta", Position::new(1, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(1, 7));
        assert!(!hit.wrapped);
    }

    #[test]
    fn forward_moves_to_following_lines_then_wraps() {
        let hit = search("alpha", Position::new(1, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(3, 6));
        let hit = search("gamma", Position::new(3, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(2, 1));
        assert!(hit.wrapped);
    }

    #[test]
    fn backward_search_and_wrap() {
        let hit = search("beta", Position::new(3, 6), false).unwrap();
        assert_eq!(hit.pos, Position::new(3, 1));
        let hit = search("alpha", Position::new(1, 1), false).unwrap();
        assert_eq!(hit.pos, Position::new(3, 6));
        assert!(hit.wrapped);
    }

    #[test]
    fn lone_match_under_cursor_is_found_after_full_wrap() {
        let hit = search("gamma", Position::new(2, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(2, 1));
        assert!(hit.wrapped);
    }

    #[test]
    fn regex_and_literal_fallback() {
        let hit = search("b.t", Position::new(1, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(1, 7));
        let broken = SearchPattern::new("a(").unwrap();
        assert!(broken.is_literal());
        let doc = TextDocument::from_text("x\ncall a(1)\n");
        let hit = find(&doc, &broken, Position::new(1, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(2, 6));
    }

    #[test]
    fn columns_count_characters() {
        let doc = TextDocument::from_text("héllo wörld\n");
        let pattern = SearchPattern::new("w").unwrap();
        let hit = find(&doc, &pattern, Position::new(1, 1), true).unwrap();
        assert_eq!(hit.pos, Position::new(1, 7));
    }

    #[test]
    fn missing_pattern() {
        assert!(search("delta", Position::new(1, 1), true).is_none());
        assert!(SearchPattern::new("").is_none());
    }
}
