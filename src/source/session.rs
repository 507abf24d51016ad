//! Source collaborator contract
//!
//! A source is opened afresh for every query. Each open yields an independent
//! scan session; sessions of the same source may be open concurrently from
//! different threads.

use std::fmt;

use super::block::Block;
use super::errors::SourceResult;

/// One open → iterate → close traversal of a source
///
/// Callers invoke `read_prefix` once, then `read` until it yields `None`, then
/// `read_suffix` exactly once, including when iteration stops early.
pub trait ScanSession {
    /// Prepares the session for reading
    fn read_prefix(&mut self) -> SourceResult<()>;

    /// Returns the next block, or `None` when the source is exhausted
    fn read(&mut self) -> SourceResult<Option<Block>>;

    /// Finalizes the session
    fn read_suffix(&mut self) -> SourceResult<()>;
}

/// A row-producing external source
pub trait DictionarySource: Send + Sync + fmt::Debug {
    /// Opens a new, independent scan session
    fn open_scan(&self) -> SourceResult<Box<dyn ScanSession + '_>>;

    /// Human-readable description for logs and `info` output
    fn describe(&self) -> String;

    /// Returns a fresh handle to the same underlying data
    fn clone_source(&self) -> Box<dyn DictionarySource>;
}
