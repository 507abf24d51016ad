//! Ancestry over the hierarchical attribute
//!
//! The hierarchical attribute maps a key to its parent key. Its null default
//! marks "no parent". Parent data comes from the source and may contain
//! cycles, so every walk is bounded by [`HIERARCHY_MAX_DEPTH`] steps and an
//! exhausted walk resolves to "not an ancestor".

use crate::observability::{log_event_at, Event, Severity};
use crate::types::{AttributeValue, Key};

use super::attribute::Attribute;
use super::direct::DirectDictionary;
use super::errors::{DictionaryError, DictionaryResult};

/// Maximum parent steps taken per (child, ancestor) pair
pub const HIERARCHY_MAX_DEPTH: usize = 1000;

/// Ancestry resolver borrowed from a dictionary with a hierarchical attribute
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy<'a> {
    dictionary: &'a DirectDictionary,
    attribute: &'a Attribute,
    null_key: Key,
}

impl<'a> Hierarchy<'a> {
    pub(crate) fn new(dictionary: &'a DirectDictionary, attribute: &'a Attribute) -> Self {
        // The registry only admits UInt64 hierarchical attributes.
        let null_key = Key::from_value(&attribute.null_value());
        debug_assert!(null_key.is_some(), "hierarchical null value must be UInt64");
        let null_key = null_key.unwrap_or_default();
        Self {
            dictionary,
            attribute,
            null_key,
        }
    }

    /// Name of the parent attribute
    pub fn attribute_name(&self) -> &str {
        self.attribute.name()
    }

    /// Key meaning "no parent"
    pub fn null_key(&self) -> Key {
        self.null_key
    }

    /// Returns the parent of each key, or the null key when absent
    pub fn to_parent(&self, ids: &[Key]) -> DictionaryResult<Vec<Key>> {
        let found = self.dictionary.get_items::<Key>(self.attribute, ids)?;
        Ok(found
            .into_iter()
            .map(|parent| parent.unwrap_or(self.null_key))
            .collect())
    }

    /// Returns the parent of a single key
    pub fn parent_of(&self, id: Key) -> DictionaryResult<Key> {
        Ok(self
            .to_parent(&[id])?
            .first()
            .copied()
            .unwrap_or(self.null_key))
    }

    /// Pairwise ancestry: `child[i]` against `ancestor[i]`
    pub fn is_in_vector_vector(
        &self,
        child_ids: &[Key],
        ancestor_ids: &[Key],
    ) -> DictionaryResult<Vec<bool>> {
        if child_ids.len() != ancestor_ids.len() {
            return Err(DictionaryError::LengthMismatch {
                dictionary: self.dictionary.full_name().to_string(),
                what: "ancestor keys",
                expected: child_ids.len(),
                actual: ancestor_ids.len(),
            });
        }
        self.is_in_impl(child_ids.len(), |i| child_ids[i], |i| ancestor_ids[i])
    }

    /// Every child against one ancestor
    pub fn is_in_vector_constant(
        &self,
        child_ids: &[Key],
        ancestor_id: Key,
    ) -> DictionaryResult<Vec<bool>> {
        self.is_in_impl(child_ids.len(), |i| child_ids[i], |_| ancestor_id)
    }

    /// One child against every ancestor
    pub fn is_in_constant_vector(
        &self,
        child_id: Key,
        ancestor_ids: &[Key],
    ) -> DictionaryResult<Vec<bool>> {
        self.is_in_impl(ancestor_ids.len(), |_| child_id, |i| ancestor_ids[i])
    }

    fn is_in_impl<C, A>(&self, rows: usize, child_at: C, ancestor_at: A) -> DictionaryResult<Vec<bool>>
    where
        C: Fn(usize) -> Key,
        A: Fn(usize) -> Key,
    {
        let mut out = Vec::with_capacity(rows);

        for row in 0..rows {
            let ancestor = ancestor_at(row);
            let mut id = child_at(row);
            let mut depth = 0;

            while id != self.null_key && id != ancestor && depth < HIERARCHY_MAX_DEPTH {
                id = self.parent_of(id)?;
                depth += 1;
            }

            if depth == HIERARCHY_MAX_DEPTH && id != self.null_key && id != ancestor {
                let child = child_at(row).to_string();
                let ancestor = ancestor.to_string();
                log_event_at(
                    Severity::Warn,
                    Event::HierarchyDepthExhausted,
                    &[
                        ("dictionary", self.dictionary.full_name()),
                        ("child", &child),
                        ("ancestor", &ancestor),
                    ],
                );
            }

            out.push(id != self.null_key && id == ancestor);
        }

        self.dictionary.metrics().add_queries(rows as u64);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AttributeSpec, DictionaryLifetime, DictionaryStructure};
    use crate::source::{Block, Column, MemorySource};
    use crate::types::Value;

    /// Builds a dictionary from (key, parent) pairs
    fn tree(edges: &[(Key, Key)]) -> DirectDictionary {
        let ids = edges.iter().map(|(k, _)| *k).collect();
        let parents = edges.iter().map(|(_, p)| Value::UInt64(*p)).collect();
        let block = Block::new(ids, vec![Column::new("parent", parents)]).unwrap();

        DirectDictionary::new(
            "",
            "tree",
            DictionaryStructure::new(vec![AttributeSpec::hierarchical_parent("parent", 0)]),
            Box::new(MemorySource::new(vec![block])),
            DictionaryLifetime::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_to_parent_uses_null_key_for_absent() {
        let dict = tree(&[(1, 0), (2, 1), (3, 2)]);
        let hierarchy = dict.hierarchy().unwrap();

        assert_eq!(hierarchy.to_parent(&[3, 2, 9]).unwrap(), vec![2, 1, 0]);
        assert_eq!(hierarchy.parent_of(1).unwrap(), 0);
    }

    #[test]
    fn test_null_key_comes_from_parent_null_value() {
        let block = Block::new(vec![5], vec![Column::new("owner", vec![Value::UInt64(7)])]).unwrap();
        let dict = DirectDictionary::new(
            "",
            "owners",
            DictionaryStructure::new(vec![AttributeSpec::hierarchical_parent("owner", 42)]),
            Box::new(MemorySource::new(vec![block])),
            DictionaryLifetime::default(),
            None,
        )
        .unwrap();
        let hierarchy = dict.hierarchy().unwrap();

        assert_eq!(hierarchy.null_key(), 42);
        assert_eq!(hierarchy.to_parent(&[5, 6]).unwrap(), vec![7, 42]);
    }

    #[test]
    fn test_is_in_walks_chain() {
        let dict = tree(&[(1, 0), (2, 1), (3, 2)]);
        let hierarchy = dict.hierarchy().unwrap();

        assert_eq!(
            hierarchy.is_in_vector_vector(&[3, 1, 2], &[1, 3, 2]).unwrap(),
            vec![true, false, true]
        );
        assert_eq!(
            hierarchy.is_in_vector_constant(&[2, 3, 9], 1).unwrap(),
            vec![true, true, false]
        );
        assert_eq!(
            hierarchy.is_in_constant_vector(3, &[2, 1, 0]).unwrap(),
            vec![true, true, false]
        );
    }

    #[test]
    fn test_cycle_terminates_as_unrelated() {
        let dict = tree(&[(1, 2), (2, 3), (3, 1)]);
        let hierarchy = dict.hierarchy().unwrap();

        assert_eq!(hierarchy.is_in_vector_constant(&[1], 99).unwrap(), vec![false]);
        // HIERARCHY_MAX_DEPTH parent lookups plus the pair itself
        assert_eq!(dict.query_count(), HIERARCHY_MAX_DEPTH as u64 + 1);
    }

    #[test]
    fn test_vector_vector_length_mismatch() {
        let dict = tree(&[(1, 0)]);
        let err = dict
            .hierarchy()
            .unwrap()
            .is_in_vector_vector(&[1, 2], &[1])
            .unwrap_err();
        assert_eq!(err.code(), "DICT_LENGTH_MISMATCH");
        assert_eq!(dict.metrics().scans_opened(), 0);
    }
}
