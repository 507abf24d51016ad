//! Dictionary error types
//!
//! Three kinds, each fatal to the call that raised it:
//! - Configuration: raised at construction, the dictionary is never built
//! - Lookup: raised before any scan is opened, the dictionary stays usable
//! - Source: raised while scanning, the scan is finalized before returning
//!
//! Cyclic or overly deep parent chains are not errors. Ancestry walks resolve
//! them to "no relation".

use std::fmt;

use thiserror::Error;

use crate::source::SourceError;
use crate::types::AttributeUnderlyingType;

/// Error kind per the dictionary error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid structure or configuration
    Configuration,
    /// Invalid call arguments
    Lookup,
    /// The source failed or produced data of the wrong shape
    Source,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "CONFIGURATION"),
            ErrorKind::Lookup => write!(f, "LOOKUP"),
            ErrorKind::Source => write!(f, "SOURCE"),
        }
    }
}

/// Result type for dictionary operations
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// Dictionary errors. Every variant names the dictionary it was raised by.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DictionaryError {
    // === Configuration ===
    #[error("{dictionary}: dictionary structure must declare at least one attribute")]
    EmptyStructure { dictionary: String },

    #[error("{dictionary}: attribute '{attribute}' is declared more than once")]
    DuplicateAttribute {
        dictionary: String,
        attribute: String,
    },

    #[error("{dictionary}: attribute '{attribute}' has the same name as the key column")]
    IdAttributeCollision {
        dictionary: String,
        attribute: String,
    },

    #[error("{dictionary}: hierarchical attribute '{attribute}' must be UInt64, got {actual}")]
    HierarchicalTypeMismatch {
        dictionary: String,
        attribute: String,
        actual: AttributeUnderlyingType,
    },

    #[error("{dictionary}: only one hierarchical attribute is allowed, found '{first}' and '{second}'")]
    MultipleHierarchical {
        dictionary: String,
        first: String,
        second: String,
    },

    #[error("{dictionary}: null value for attribute '{attribute}' is not a valid {expected}: {reason}")]
    InvalidNullValue {
        dictionary: String,
        attribute: String,
        expected: AttributeUnderlyingType,
        reason: String,
    },

    #[error("{dictionary}: 'key' is not supported for dictionary of layout 'direct'")]
    UnsupportedKey { dictionary: String },

    #[error("{dictionary}: elements .structure.range_min and .structure.range_max should be defined only for a dictionary of layout 'range_hashed'")]
    UnsupportedRange { dictionary: String },

    #[error("{dictionary}: unsupported layout '{layout}', expected 'direct'")]
    UnsupportedLayout { dictionary: String, layout: String },

    #[error("invalid configuration in {origin}: {reason}")]
    InvalidConfig { origin: String, reason: String },

    // === Lookup ===
    #[error("{dictionary}: no such attribute '{attribute}'")]
    AttributeNotFound {
        dictionary: String,
        attribute: String,
    },

    #[error("{dictionary}: type mismatch: attribute '{attribute}' has type {actual}, requested {requested}")]
    TypeMismatch {
        dictionary: String,
        attribute: String,
        actual: AttributeUnderlyingType,
        requested: AttributeUnderlyingType,
    },

    #[error("{dictionary}: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        dictionary: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{dictionary}: no such column '{column}'")]
    UnknownColumn { dictionary: String, column: String },

    #[error("{dictionary}: max_block_size must be greater than zero")]
    InvalidBlockSize { dictionary: String },

    // === Source ===
    #[error("{dictionary}: source value of type {found} for attribute '{attribute}' cannot be read as {expected}")]
    ColumnTypeMismatch {
        dictionary: String,
        attribute: String,
        expected: AttributeUnderlyingType,
        found: &'static str,
    },

    #[error("{dictionary}: {error}")]
    Source {
        dictionary: String,
        #[source]
        error: SourceError,
    },
}

impl DictionaryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DictionaryError::EmptyStructure { .. } => "DICT_EMPTY_STRUCTURE",
            DictionaryError::DuplicateAttribute { .. } => "DICT_DUPLICATE_ATTRIBUTE",
            DictionaryError::IdAttributeCollision { .. } => "DICT_ID_ATTRIBUTE_COLLISION",
            DictionaryError::HierarchicalTypeMismatch { .. } => "DICT_HIERARCHICAL_TYPE_MISMATCH",
            DictionaryError::MultipleHierarchical { .. } => "DICT_MULTIPLE_HIERARCHICAL",
            DictionaryError::InvalidNullValue { .. } => "DICT_INVALID_NULL_VALUE",
            DictionaryError::UnsupportedKey { .. } => "DICT_UNSUPPORTED_KEY",
            DictionaryError::UnsupportedRange { .. } => "DICT_UNSUPPORTED_RANGE",
            DictionaryError::UnsupportedLayout { .. } => "DICT_UNSUPPORTED_LAYOUT",
            DictionaryError::InvalidConfig { .. } => "DICT_INVALID_CONFIG",
            DictionaryError::AttributeNotFound { .. } => "DICT_ATTRIBUTE_NOT_FOUND",
            DictionaryError::TypeMismatch { .. } => "DICT_TYPE_MISMATCH",
            DictionaryError::LengthMismatch { .. } => "DICT_LENGTH_MISMATCH",
            DictionaryError::UnknownColumn { .. } => "DICT_UNKNOWN_COLUMN",
            DictionaryError::InvalidBlockSize { .. } => "DICT_INVALID_BLOCK_SIZE",
            DictionaryError::ColumnTypeMismatch { .. } => "DICT_COLUMN_TYPE_MISMATCH",
            DictionaryError::Source { error, .. } => error.code(),
        }
    }

    /// Returns the taxonomy kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            DictionaryError::EmptyStructure { .. }
            | DictionaryError::DuplicateAttribute { .. }
            | DictionaryError::IdAttributeCollision { .. }
            | DictionaryError::HierarchicalTypeMismatch { .. }
            | DictionaryError::MultipleHierarchical { .. }
            | DictionaryError::InvalidNullValue { .. }
            | DictionaryError::UnsupportedKey { .. }
            | DictionaryError::UnsupportedRange { .. }
            | DictionaryError::UnsupportedLayout { .. }
            | DictionaryError::InvalidConfig { .. } => ErrorKind::Configuration,
            DictionaryError::AttributeNotFound { .. }
            | DictionaryError::TypeMismatch { .. }
            | DictionaryError::LengthMismatch { .. }
            | DictionaryError::UnknownColumn { .. }
            | DictionaryError::InvalidBlockSize { .. } => ErrorKind::Lookup,
            DictionaryError::ColumnTypeMismatch { .. } | DictionaryError::Source { .. } => {
                ErrorKind::Source
            }
        }
    }

    pub(crate) fn invalid_config(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        DictionaryError::InvalidConfig {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn from_source(dictionary: &str, error: SourceError) -> Self {
        DictionaryError::Source {
            dictionary: dictionary.to_string(),
            error,
        }
    }
}
