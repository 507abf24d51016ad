//! Direct dictionary engine
//!
//! A direct dictionary answers point queries over an external source without
//! holding any of its data. Every call re-reads the source, so answers always
//! reflect the source's current contents.
//!
//! # Components
//!
//! - `AttributeRegistry`: typed attributes and their null defaults
//! - `DirectDictionary`: value lookup, existence, key enumeration
//! - `Hierarchy`: bounded ancestry walks over the parent attribute
//! - `DictionaryBlockStream`: batched export of all present keys
//!
//! # Invariants
//!
//! - The registry is immutable after construction
//! - Query counters only grow
//! - Every scan session is finalized, on success and on error

mod arena;
mod attribute;
mod block_stream;
mod config;
mod direct;
mod errors;
mod factory;
mod hierarchy;
mod scan;
mod structure;

pub use arena::{StringArena, StringRef};
pub use attribute::{Attribute, AttributeRegistry};
pub use block_stream::DictionaryBlockStream;
pub use config::{DictionaryConfig, SourceConfig};
pub use direct::{Defaults, DirectDictionary};
pub use errors::{DictionaryError, DictionaryResult, ErrorKind};
pub use factory::{create_direct_dictionary, open_dictionary, DIRECT_LAYOUT};
pub use hierarchy::{Hierarchy, HIERARCHY_MAX_DEPTH};
pub use structure::{AttributeSpec, DictionaryLifetime, DictionaryStructure, IdSpec};
