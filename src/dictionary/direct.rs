//! Direct dictionary
//!
//! Holds no copy of its data. Every lookup opens a fresh scan against the
//! source, compares every scanned row with every requested key, and fills
//! unmatched requests from the selected default policy.
//!
//! # Matching rules
//!
//! - Rows are visited in source delivery order
//! - The first row carrying a requested key wins; later duplicates are ignored
//! - Blocks without the target attribute's column contribute no matches
//! - Argument errors are raised before any scan is opened

use std::fmt;

use crate::observability::{
    log_event_at, log_event_with_fields, DictionaryMetrics, Event, Logger, Severity,
};
use crate::source::{Block, Column, DictionarySource, SourceError};
use crate::types::{with_underlying_type, AttributeUnderlyingType, AttributeValue, Key};

use super::attribute::{Attribute, AttributeRegistry};
use super::block_stream::DictionaryBlockStream;
use super::errors::{DictionaryError, DictionaryResult};
use super::hierarchy::Hierarchy;
use super::scan::Scan;
use super::structure::{DictionaryLifetime, DictionaryStructure};

/// Default policy for requested keys the scan did not find
#[derive(Debug, Clone, PartialEq)]
pub enum Defaults<'a, T> {
    /// The attribute's own null default
    Null,
    /// One default per requested key, aligned by index
    PerRow(&'a [T]),
    /// One default for every unfound key
    Constant(T),
}

impl<T: Clone> Defaults<'_, T> {
    fn check_len(&self, dictionary: &str, rows: usize) -> DictionaryResult<()> {
        match self {
            Defaults::PerRow(defaults) if defaults.len() != rows => {
                Err(DictionaryError::LengthMismatch {
                    dictionary: dictionary.to_string(),
                    what: "default values",
                    expected: rows,
                    actual: defaults.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn value_at(&self, row: usize, null: &T) -> T {
        match self {
            Defaults::Null => null.clone(),
            Defaults::PerRow(defaults) => defaults[row].clone(),
            Defaults::Constant(value) => value.clone(),
        }
    }
}

/// A dictionary answering every query with a full source scan
pub struct DirectDictionary {
    database: String,
    name: String,
    full_name: String,
    structure: DictionaryStructure,
    attributes: AttributeRegistry,
    source: Box<dyn DictionarySource>,
    lifetime: DictionaryLifetime,
    saved_block: Option<Block>,
    metrics: DictionaryMetrics,
}

impl DirectDictionary {
    /// Builds a dictionary over `source`.
    ///
    /// Fails with a configuration error if the structure is invalid for the
    /// direct layout.
    pub fn new(
        database: impl Into<String>,
        name: impl Into<String>,
        structure: DictionaryStructure,
        source: Box<dyn DictionarySource>,
        lifetime: DictionaryLifetime,
        saved_block: Option<Block>,
    ) -> DictionaryResult<Self> {
        let database = database.into();
        let name = name.into();
        let full_name = if database.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", database, name)
        };

        let attributes = AttributeRegistry::build(&full_name, &structure)?;
        let metrics = DictionaryMetrics::new(attributes.bytes_allocated() as u64);

        let attribute_count = attributes.len().to_string();
        let description = source.describe();
        log_event_with_fields(
            Event::DictionaryCreated,
            &[
                ("dictionary", &full_name),
                ("attributes", &attribute_count),
                ("source", &description),
            ],
        );

        Ok(Self {
            database,
            name,
            full_name,
            structure,
            attributes,
            source,
            lifetime,
            saved_block,
            metrics,
        })
    }

    // ------------------------------------------------------------------
    // Value lookup
    // ------------------------------------------------------------------

    /// Looks up attribute `attribute` of type `T` for every key in `ids`.
    ///
    /// All requests share one scan. String attributes work the same way,
    /// with the null default read from the attribute's arena.
    pub fn get<T: AttributeValue>(
        &self,
        attribute: &str,
        ids: &[Key],
        defaults: Defaults<'_, T>,
    ) -> DictionaryResult<Vec<T>> {
        let attr = self.typed_attribute(attribute, T::TYPE)?;
        defaults.check_len(&self.full_name, ids.len())?;

        let null = self.null_of::<T>(attr)?;
        let found = self.get_items::<T>(attr, ids)?;
        Ok(apply_defaults(found, &defaults, &null))
    }

    /// Shorthand for `get::<String>`
    pub fn get_string(
        &self,
        attribute: &str,
        ids: &[Key],
        defaults: Defaults<'_, String>,
    ) -> DictionaryResult<Vec<String>> {
        self.get::<String>(attribute, ids, defaults)
    }

    /// Looks up any attribute, falling back to its null default
    pub fn get_column(&self, attribute: &str, ids: &[Key]) -> DictionaryResult<Column> {
        let attr = self.attribute(attribute)?;
        let values = with_underlying_type!(attr.underlying_type(), T => {
            let null = self.null_of::<T>(attr)?;
            let found = self.get_items::<T>(attr, ids)?;
            apply_defaults(found, &Defaults::Null, &null)
                .into_iter()
                .map(AttributeValue::into_value)
                .collect::<Vec<_>>()
        });
        Ok(Column::new(attr.name(), values))
    }

    /// Scans once and returns the first matching value per request.
    ///
    /// Counts `ids.len()` queries once the scan completes.
    pub(crate) fn get_items<T: AttributeValue>(
        &self,
        attribute: &Attribute,
        ids: &[Key],
    ) -> DictionaryResult<Vec<Option<T>>> {
        let mut found: Vec<Option<T>> = vec![None; ids.len()];
        let mut hits = 0usize;

        self.scan_all(|block| {
            let column = match block.column(attribute.name()) {
                Some(column) => column,
                None => return Ok(()),
            };

            for (&key, value) in block.ids().iter().zip(column.values()) {
                for (slot, &id) in found.iter_mut().zip(ids) {
                    if id != key || slot.is_some() {
                        continue;
                    }
                    let typed = T::from_value(value).ok_or_else(|| {
                        DictionaryError::ColumnTypeMismatch {
                            dictionary: self.full_name.clone(),
                            attribute: attribute.name().to_string(),
                            expected: attribute.underlying_type(),
                            found: value.type_name(),
                        }
                    })?;
                    *slot = Some(typed);
                    hits += 1;
                }
            }
            Ok(())
        })?;

        self.metrics.add_queries(ids.len() as u64);

        if Logger::enabled(Severity::Trace) {
            let rows = ids.len().to_string();
            let hits = hits.to_string();
            log_event_at(
                Severity::Trace,
                Event::LookupComplete,
                &[
                    ("dictionary", &self.full_name),
                    ("attribute", attribute.name()),
                    ("rows", &rows),
                    ("found", &hits),
                ],
            );
        }

        Ok(found)
    }

    // ------------------------------------------------------------------
    // Existence and enumeration
    // ------------------------------------------------------------------

    /// Returns whether each key appears in the source
    pub fn has(&self, ids: &[Key]) -> DictionaryResult<Vec<bool>> {
        let first = self
            .attributes
            .first()
            .ok_or_else(|| DictionaryError::EmptyStructure {
                dictionary: self.full_name.clone(),
            })?;

        with_underlying_type!(first.underlying_type(), T => self.has_impl::<T>(first, ids))
    }

    fn has_impl<T: AttributeValue>(
        &self,
        attribute: &Attribute,
        ids: &[Key],
    ) -> DictionaryResult<Vec<bool>> {
        let mut out = vec![false; ids.len()];
        self.scan_all(|block| {
            for &key in block.ids() {
                for (present, &id) in out.iter_mut().zip(ids) {
                    if id == key {
                        *present = true;
                    }
                }
            }
            Ok(())
        })?;

        self.metrics.add_queries(ids.len() as u64);

        let rows = ids.len().to_string();
        log_event_at(
            Severity::Trace,
            Event::LookupComplete,
            &[
                ("dictionary", &self.full_name),
                ("attribute", attribute.name()),
                ("type", T::TYPE.type_name()),
                ("rows", &rows),
            ],
        );
        Ok(out)
    }

    /// Returns every key in scan order, duplicates included
    pub fn get_ids(&self) -> DictionaryResult<Vec<Key>> {
        let mut ids = Vec::new();
        self.scan_all(|block| {
            ids.extend_from_slice(block.ids());
            Ok(())
        })?;
        Ok(ids)
    }

    /// Opens a lazy stream of result blocks over all present keys.
    ///
    /// An empty `columns` list selects the key column and every attribute.
    pub fn block_stream(
        &self,
        columns: &[&str],
        max_block_size: usize,
    ) -> DictionaryResult<DictionaryBlockStream<'_>> {
        DictionaryBlockStream::open(self, columns, max_block_size)
    }

    /// Returns the ancestry resolver, if a hierarchical attribute exists
    pub fn hierarchy(&self) -> Option<Hierarchy<'_>> {
        self.attributes
            .hierarchical()
            .map(|attribute| Hierarchy::new(self, attribute))
    }

    // ------------------------------------------------------------------
    // Info
    // ------------------------------------------------------------------

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `database.name`, or `name` without a database
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn type_name(&self) -> &'static str {
        "Direct"
    }

    pub fn query_count(&self) -> u64 {
        self.metrics.query_count()
    }

    pub fn bytes_allocated(&self) -> u64 {
        self.metrics.bytes_allocated()
    }

    pub fn metrics(&self) -> &DictionaryMetrics {
        &self.metrics
    }

    /// Every lookup reads the source
    pub fn hit_rate(&self) -> f64 {
        1.0
    }

    /// Nothing is held in memory
    pub fn element_count(&self) -> usize {
        0
    }

    pub fn load_factor(&self) -> f64 {
        0.0
    }

    pub fn is_injective(&self, attribute: &str) -> DictionaryResult<bool> {
        self.attribute(attribute).map(Attribute::is_injective)
    }

    pub fn lifetime(&self) -> DictionaryLifetime {
        self.lifetime
    }

    pub fn structure(&self) -> &DictionaryStructure {
        &self.structure
    }

    pub fn saved_block(&self) -> Option<&Block> {
        self.saved_block.as_ref()
    }

    pub fn source(&self) -> &dyn DictionarySource {
        self.source.as_ref()
    }

    pub fn attributes(&self) -> &AttributeRegistry {
        &self.attributes
    }

    /// Returns the named attribute or a lookup error
    pub fn attribute(&self, name: &str) -> DictionaryResult<&Attribute> {
        self.attributes
            .get(name)
            .ok_or_else(|| DictionaryError::AttributeNotFound {
                dictionary: self.full_name.clone(),
                attribute: name.to_string(),
            })
    }

    /// Creates an equivalent dictionary over a fresh source handle
    pub fn clone_dictionary(&self) -> DictionaryResult<DirectDictionary> {
        DirectDictionary::new(
            self.database.clone(),
            self.name.clone(),
            self.structure.clone(),
            self.source.clone_source(),
            self.lifetime,
            self.saved_block.clone(),
        )
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn typed_attribute(
        &self,
        name: &str,
        requested: AttributeUnderlyingType,
    ) -> DictionaryResult<&Attribute> {
        let attr = self.attribute(name)?;
        if attr.underlying_type() != requested {
            return Err(DictionaryError::TypeMismatch {
                dictionary: self.full_name.clone(),
                attribute: name.to_string(),
                actual: attr.underlying_type(),
                requested,
            });
        }
        Ok(attr)
    }

    pub(crate) fn null_of<T: AttributeValue>(&self, attribute: &Attribute) -> DictionaryResult<T> {
        let null = attribute.null_value();
        T::from_value(&null).ok_or_else(|| DictionaryError::TypeMismatch {
            dictionary: self.full_name.clone(),
            attribute: attribute.name().to_string(),
            actual: attribute.underlying_type(),
            requested: T::TYPE,
        })
    }

    /// Runs one complete scan, handing each block to `visit`.
    ///
    /// The session is finalized on every path out of this function.
    fn scan_all<F>(&self, mut visit: F) -> DictionaryResult<()>
    where
        F: FnMut(&Block) -> DictionaryResult<()>,
    {
        let source_error = |e: SourceError| DictionaryError::from_source(&self.full_name, e);

        let mut scan = Scan::open(self.source.as_ref(), &self.full_name).map_err(source_error)?;
        self.metrics.increment_scans_opened();

        while let Some(block) = scan.next_block().map_err(source_error)? {
            visit(&block)?;
        }

        let summary = scan.finish().map_err(source_error)?;
        self.metrics.add_rows_scanned(summary.rows);
        Ok(())
    }
}

impl fmt::Debug for DirectDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectDictionary")
            .field("full_name", &self.full_name)
            .field("attributes", &self.attributes.len())
            .field("source", &self.source)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

fn apply_defaults<T: Clone>(found: Vec<Option<T>>, defaults: &Defaults<'_, T>, null: &T) -> Vec<T> {
    found
        .into_iter()
        .enumerate()
        .map(|(row, value)| value.unwrap_or_else(|| defaults.value_at(row, null)))
        .collect()
}
