//! directdict - direct (uncached) external dictionary lookups
//!
//! A direct dictionary keeps none of its data in memory. Every lookup,
//! existence check, or ancestry test re-reads the external source, so answers
//! are always as fresh as the source itself.
//!
//! # Quick start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use directdict::dictionary::{AttributeSpec, Defaults, DictionaryLifetime, DictionaryStructure, DirectDictionary};
//! use directdict::source::{Block, Column, MemorySource};
//! use directdict::types::Value;
//!
//! let block = Block::new(
//!     vec![1, 2],
//!     vec![
//!         Column::new("parent", vec![Value::UInt64(0), Value::UInt64(1)]),
//!         Column::new("region", vec![Value::String("US".into()), Value::String("CA".into())]),
//!     ],
//! )?;
//! let dict = DirectDictionary::new(
//!     "geo",
//!     "regions",
//!     DictionaryStructure::new(vec![
//!         AttributeSpec::hierarchical_parent("parent", 0),
//!         AttributeSpec::string("region", "unknown"),
//!     ]),
//!     Box::new(MemorySource::new(vec![block])),
//!     DictionaryLifetime::default(),
//!     None,
//! )?;
//!
//! assert_eq!(dict.get_string("region", &[2, 9], Defaults::Null)?, vec!["CA", "unknown"]);
//! let hierarchy = dict.hierarchy().ok_or("no hierarchy")?;
//! assert!(hierarchy.is_in_vector_constant(&[2], 1)?[0]);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod dictionary;
pub mod observability;
pub mod source;
pub mod types;
