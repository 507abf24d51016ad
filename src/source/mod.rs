//! Dictionary sources
//!
//! The external source is a collaborator: it produces row batches on demand
//! and holds no state on behalf of the dictionary. Every query opens its own
//! scan session.
//!
//! # Contract
//!
//! - A session is opened, read block by block, then finalized
//! - Each block has one key column and one value column per attribute
//! - Columns are aligned with the key column by row index
//! - Finalization happens on every exit path, including errors

mod block;
mod errors;
mod file;
mod memory;
mod session;

pub use block::{Block, Column};
pub use errors::{SourceError, SourceResult};
pub use file::{FileFormat, FileSource};
pub use memory::MemorySource;
pub use session::{DictionarySource, ScanSession};
