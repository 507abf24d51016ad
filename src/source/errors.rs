//! Source error types
//!
//! Error codes:
//! - DICT_SOURCE_IO (I/O failure while opening or reading the source)
//! - DICT_SOURCE_MALFORMED (source data does not match the declared structure)
//! - DICT_SOURCE_SHAPE (block columns are not aligned with the key column)
//! - DICT_SOURCE_FAILED (any other failure surfaced by a source)

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors surfaced by a dictionary source while producing blocks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("Failed to read '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed data in {origin}: {reason}")]
    Malformed { origin: String, reason: String },

    #[error("Column '{column}' has {actual} rows, key column has {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Source failure: {0}")]
    Failed(String),
}

impl SourceError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SourceError::Io { .. } => "DICT_SOURCE_IO",
            SourceError::Malformed { .. } => "DICT_SOURCE_MALFORMED",
            SourceError::ColumnLengthMismatch { .. } => "DICT_SOURCE_SHAPE",
            SourceError::Failed(_) => "DICT_SOURCE_FAILED",
        }
    }

    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::Malformed {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}
