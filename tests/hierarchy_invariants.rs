//! Hierarchy Invariant Tests
//!
//! Tests for ancestry walks over the parent attribute:
//! - Acyclic chains shorter than the depth bound resolve correctly
//! - Cycles terminate and resolve to "not an ancestor"
//! - The null key is never an ancestor
//! - Dictionaries without a parent attribute offer no hierarchy

use directdict::dictionary::{
    AttributeSpec, DictionaryLifetime, DictionaryStructure, DirectDictionary, HIERARCHY_MAX_DEPTH,
};
use directdict::source::{Block, Column, MemorySource};
use directdict::types::{AttributeUnderlyingType, Key, Value};

// =============================================================================
// Helper Functions
// =============================================================================

/// Dictionary over (key, parent) edges, split into blocks of `block_rows`
fn tree(edges: &[(Key, Key)], null_key: Key, block_rows: usize) -> DirectDictionary {
    let blocks = edges
        .chunks(block_rows)
        .map(|chunk| {
            Block::new(
                chunk.iter().map(|(k, _)| *k).collect(),
                vec![Column::new(
                    "parent",
                    chunk.iter().map(|(_, p)| Value::UInt64(*p)).collect(),
                )],
            )
            .unwrap()
        })
        .collect();

    DirectDictionary::new(
        "",
        "tree",
        DictionaryStructure::new(vec![AttributeSpec::hierarchical_parent("parent", null_key)]),
        Box::new(MemorySource::new(blocks)),
        DictionaryLifetime::default(),
        None,
    )
    .unwrap()
}

/// Chain 1 <- 2 <- ... <- n, rooted at `1` whose parent is 0
fn chain(n: Key) -> Vec<(Key, Key)> {
    (1..=n).map(|k| (k, k - 1)).collect()
}

// =============================================================================
// Termination Tests
// =============================================================================

/// A deep acyclic chain below the bound resolves to true.
#[test]
fn test_acyclic_chain_reaches_root() {
    let dict = tree(&chain(50), 0, 16);
    let hierarchy = dict.hierarchy().unwrap();

    assert_eq!(hierarchy.is_in_vector_constant(&[50], 1).unwrap(), vec![true]);
    assert_eq!(hierarchy.is_in_vector_constant(&[1], 50).unwrap(), vec![false]);
}

/// Cycles of various lengths terminate with false.
#[test]
fn test_cycles_terminate() {
    for len in [1u64, 2, 7] {
        let edges: Vec<(Key, Key)> = (1..=len).map(|k| (k, k % len + 1)).collect();
        let dict = tree(&edges, 0, 4);
        let hierarchy = dict.hierarchy().unwrap();

        assert_eq!(
            hierarchy.is_in_vector_constant(&[1], 1000).unwrap(),
            vec![false],
            "cycle of length {}",
            len
        );
    }
}

/// Members of a cycle still see each other as ancestors.
#[test]
fn test_ancestor_inside_cycle_is_found() {
    let dict = tree(&[(1, 2), (2, 3), (3, 1)], 0, 8);
    let hierarchy = dict.hierarchy().unwrap();

    assert_eq!(
        hierarchy.is_in_constant_vector(1, &[2, 3, 4]).unwrap(),
        vec![true, true, false]
    );
}

/// Exhausting the bound costs exactly HIERARCHY_MAX_DEPTH parent lookups.
#[test]
fn test_depth_bound_limits_scans() {
    let dict = tree(&[(1, 1)], 0, 1);
    let hierarchy = dict.hierarchy().unwrap();

    assert_eq!(hierarchy.is_in_vector_constant(&[1], 2).unwrap(), vec![false]);
    assert_eq!(dict.metrics().scans_opened(), HIERARCHY_MAX_DEPTH as u64);
}

// =============================================================================
// Null Key Tests
// =============================================================================

/// A custom null key ends walks.
#[test]
fn test_custom_null_key() {
    let dict = tree(&[(10, 99), (11, 10)], 99, 8);
    let hierarchy = dict.hierarchy().unwrap();

    assert_eq!(hierarchy.null_key(), 99);
    assert_eq!(hierarchy.to_parent(&[11, 10, 5]).unwrap(), vec![10, 99, 99]);
    assert_eq!(
        hierarchy.is_in_vector_constant(&[11, 10], 99).unwrap(),
        vec![false, false]
    );
}

/// Keys missing from the source have no ancestors.
#[test]
fn test_unknown_child_has_no_ancestor() {
    let dict = tree(&chain(3), 0, 8);
    let hierarchy = dict.hierarchy().unwrap();

    assert_eq!(hierarchy.parent_of(42).unwrap(), 0);
    assert_eq!(hierarchy.is_in_vector_constant(&[42], 1).unwrap(), vec![false]);
}

// =============================================================================
// Shape Tests
// =============================================================================

/// The three call shapes agree on the same pairs.
#[test]
fn test_call_shapes_agree() {
    let dict = tree(&chain(5), 0, 2);
    let hierarchy = dict.hierarchy().unwrap();

    let children = [5, 4, 2, 1];
    let by_pairs = hierarchy.is_in_vector_vector(&children, &[3, 3, 3, 3]).unwrap();
    let by_constant = hierarchy.is_in_vector_constant(&children, 3).unwrap();
    assert_eq!(by_pairs, by_constant);
    assert_eq!(by_pairs, vec![true, true, false, false]);

    let by_child = hierarchy.is_in_constant_vector(4, &[1, 2, 3, 5]).unwrap();
    assert_eq!(by_child, vec![true, true, true, false]);
}

/// Without a hierarchical attribute there is no resolver.
#[test]
fn test_no_hierarchy_without_parent_attribute() {
    let dict = DirectDictionary::new(
        "",
        "flat",
        DictionaryStructure::new(vec![AttributeSpec::new(
            "parent",
            AttributeUnderlyingType::UInt64,
        )]),
        Box::new(MemorySource::new(vec![])),
        DictionaryLifetime::default(),
        None,
    )
    .unwrap();

    assert!(dict.hierarchy().is_none());
}

/// Hierarchical attributes must be UInt64.
#[test]
fn test_hierarchical_type_is_checked_at_construction() {
    let err = DirectDictionary::new(
        "db",
        "bad",
        DictionaryStructure::new(vec![
            AttributeSpec::new("parent", AttributeUnderlyingType::UInt32).hierarchical()
        ]),
        Box::new(MemorySource::new(vec![])),
        DictionaryLifetime::default(),
        None,
    )
    .unwrap_err();

    assert_eq!(err.code(), "DICT_HIERARCHICAL_TYPE_MISMATCH");
    assert!(err.to_string().contains("db.bad"));
    assert!(err.to_string().contains("UInt32"));
}
