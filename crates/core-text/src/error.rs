//! Error kinds surfaced by the document store and cursors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Line or column reference outside the currently valid bounds.
    #[error("{what} {index} out of range (valid {min}..={max})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        min: usize,
        max: usize,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// `save` called on a document that has no filename.
    #[error("document has no filename to save to")]
    MissingDestination,
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] std::io::Error),
    /// A mutation was requested while the document was already borrowed,
    /// i.e. from inside one of its own change notifications.
    #[error("document mutated while delivering a notification")]
    ReentrantMutation,
}

impl DocumentError {
    pub(crate) fn line(index: usize, max: usize) -> Self {
        Self::OutOfRange {
            what: "line",
            index,
            min: 1,
            max,
        }
    }

    pub(crate) fn column(index: usize, max: usize) -> Self {
        Self::OutOfRange {
            what: "column",
            index,
            min: 1,
            max,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
