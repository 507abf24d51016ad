//! CLI-specific error types
//!
//! All CLI errors are fatal to the command that raised them.

use std::fmt;
use std::io;

use crate::dictionary::DictionaryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// I/O error (stdout)
    IoError,
    /// Argument cannot be used with this dictionary
    InvalidArgument,
    /// Ancestry requested from a dictionary without a hierarchical attribute
    NoHierarchy,
    /// Error raised by the dictionary, carrying its own code
    Dictionary(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "DICT_CLI_IO_ERROR",
            Self::InvalidArgument => "DICT_CLI_INVALID_ARGUMENT",
            Self::NoHierarchy => "DICT_CLI_NO_HIERARCHY",
            Self::Dictionary(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid argument
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    /// Dictionary has no hierarchical attribute
    pub fn no_hierarchy(dictionary: &str) -> Self {
        Self::new(
            CliErrorCode::NoHierarchy,
            format!("{}: dictionary has no hierarchical attribute", dictionary),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DictionaryError> for CliError {
    fn from(e: DictionaryError) -> Self {
        Self::new(CliErrorCode::Dictionary(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
