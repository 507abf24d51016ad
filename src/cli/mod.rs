//! CLI module for directdict
//!
//! Provides command-line interface for:
//! - get: attribute lookup
//! - has: key existence
//! - is-in: ancestry through the hierarchical attribute
//! - ids: key enumeration
//! - dump: block export
//! - info: structure and counters

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{dump, get, has, ids, info, is_in, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, write_error, write_response};
