//! End-of-line detection and normalization for loaded sources.
//!
//! The document model stores a single `'\n'` marker per line. Sources using
//! CRLF or bare CR are rewritten on load; the detected style is kept so callers
//! can report it, but saving always emits the normalized form.

/// The in-memory end-of-line marker.
pub const EOL: char = '\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Result of normalizing a raw source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// LF-only content.
    pub normalized: String,
    /// Majority style of the source (ties: CRLF > LF > CR).
    pub original: LineEnding,
    pub had_trailing_newline: bool,
    /// More than one style was present.
    pub mixed: bool,
}

/// Rewrite every CRLF / CR in `input` to LF and report the dominant style.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let mut out = String::with_capacity(input.len());
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                out.push(EOL);
            }
            '\r' => {
                cr += 1;
                out.push(EOL);
            }
            '\n' => {
                lf += 1;
                out.push(EOL);
            }
            other => out.push(other),
        }
    }

    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let styles_seen = [crlf, lf, cr].iter().filter(|c| **c > 0).count();

    NormalizedText {
        had_trailing_newline: out.ends_with(EOL),
        normalized: out,
        original,
        mixed: styles_seen > 1,
    }
}

/// `text` with exactly one trailing marker.
pub fn with_eol(text: &str) -> String {
    let mut s = without_eol(text).to_string();
    s.push(EOL);
    s
}

/// `text` with a single trailing marker removed, if present.
pub fn without_eol(text: &str) -> &str {
    text.strip_suffix(EOL).unwrap_or(text)
}
