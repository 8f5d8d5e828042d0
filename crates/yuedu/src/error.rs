//! Yuedu error types.

use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid vocabulary: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid text: {0}")]
    TextImport(#[from] TextImportError),
    #[error("No text with id {0}")]
    TextNotFound(String),
    #[error("Failed to {action}")]
    Persistence {
        action: String,
        #[source]
        source: StoreError,
    },
}

impl Error {
    pub(crate) fn persistence(action: impl Into<String>, source: StoreError) -> Self {
        Self::Persistence {
            action: action.into(),
            source,
        }
    }
}

/// Structural problems with words crossing a trust boundary.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of words")]
    NotAnArray,
    #[error("entry {index} is not an object")]
    NotAnObject { index: usize },
    #[error("entry {index} is missing a non-empty string `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("a word must have non-empty hanzi")]
    EmptyHanzi,
}

/// Problems with a text being imported, worded for the person importing it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextImportError {
    #[error("Title cannot be empty.")]
    EmptyTitle,
    #[error("Mandarin, Pinyin, and English fields cannot be empty.")]
    EmptyFields,
    #[error(
        "Segment counts do not match after splitting by '|'. Mandarin: {mandarin}, Pinyin: {pinyin}, English: {english}"
    )]
    SegmentCountMismatch {
        mandarin: usize,
        pinyin: usize,
        english: usize,
    },
    #[error("No valid segments found. Ensure you use \"|\" to separate words.")]
    NoSegments,
}

/// An error from one of the persistent stores.
pub struct StoreError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl StoreError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(err.into())
    }
}

impl fmt::Debug for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
