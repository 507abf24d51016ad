//! Scan Discipline Tests
//!
//! Tests for the scan session lifecycle:
//! - One scan per query, opened fresh each time
//! - Every session is finalized, including on errors
//! - Source errors surface with the dictionary name
//! - Source values of the wrong variant are data-shape errors

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use directdict::dictionary::{
    AttributeSpec, Defaults, DictionaryLifetime, DictionaryStructure, DirectDictionary, ErrorKind,
};
use directdict::source::{
    Block, Column, DictionarySource, MemorySource, ScanSession, SourceError, SourceResult,
};
use directdict::types::{AttributeUnderlyingType, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn score_structure() -> DictionaryStructure {
    DictionaryStructure::new(vec![AttributeSpec::new("score", AttributeUnderlyingType::Int32)])
}

fn score_block(ids: Vec<u64>, values: Vec<Value>) -> Block {
    Block::new(ids, vec![Column::new("score", values)]).unwrap()
}

fn build(source: Box<dyn DictionarySource>) -> DirectDictionary {
    DirectDictionary::new(
        "",
        "scores",
        score_structure(),
        source,
        DictionaryLifetime::default(),
        None,
    )
    .unwrap()
}

/// Source whose sessions fail on finalize
#[derive(Debug, Default)]
struct FailingSuffixSource {
    finalize_attempts: Arc<AtomicU64>,
}

struct FailingSuffixScan {
    attempts: Arc<AtomicU64>,
    done: bool,
}

impl ScanSession for FailingSuffixScan {
    fn read_prefix(&mut self) -> SourceResult<()> {
        Ok(())
    }

    fn read(&mut self) -> SourceResult<Option<Block>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        Ok(Some(score_block(vec![1], vec![Value::Int32(5)])))
    }

    fn read_suffix(&mut self) -> SourceResult<()> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(SourceError::Failed("cannot close connection".into()))
    }
}

impl DictionarySource for FailingSuffixSource {
    fn open_scan(&self) -> SourceResult<Box<dyn ScanSession + '_>> {
        Ok(Box::new(FailingSuffixScan {
            attempts: Arc::clone(&self.finalize_attempts),
            done: false,
        }))
    }

    fn describe(&self) -> String {
        "failing suffix".to_string()
    }

    fn clone_source(&self) -> Box<dyn DictionarySource> {
        Box::new(FailingSuffixSource::default())
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

/// Each query opens and finalizes exactly one session.
#[test]
fn test_one_session_per_query() {
    let source = MemorySource::new(vec![score_block(vec![1, 2], vec![Value::Int32(1), Value::Int32(2)])]);
    let dict = build(Box::new(source.clone()));

    dict.get::<i32>("score", &[1], Defaults::Null).unwrap();
    dict.has(&[1, 2]).unwrap();
    dict.get_ids().unwrap();

    assert_eq!(source.scans_opened(), 3);
    assert_eq!(source.scans_finalized(), 3);
    assert_eq!(dict.metrics().scans_opened(), 3);
    assert_eq!(dict.metrics().rows_scanned(), 6);
}

/// A lookup that matches nothing still finalizes its session.
#[test]
fn test_no_match_still_finalizes() {
    let source = MemorySource::new(vec![score_block(vec![1], vec![Value::Int32(1)])]);
    let dict = build(Box::new(source.clone()));

    assert_eq!(
        dict.get::<i32>("score", &[7], Defaults::Constant(-1)).unwrap(),
        vec![-1]
    );
    assert_eq!(source.scans_finalized(), 1);
}

/// A source failure mid-scan finalizes the session and names the dictionary.
#[test]
fn test_source_error_finalizes_session() {
    let source = MemorySource::new(vec![
        score_block(vec![1], vec![Value::Int32(1)]),
        score_block(vec![2], vec![Value::Int32(2)]),
    ])
    .failing_at(1);
    let dict = build(Box::new(source.clone()));

    let err = dict.get::<i32>("score", &[2], Defaults::Null).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Source);
    assert_eq!(err.code(), "DICT_SOURCE_FAILED");
    assert!(err.to_string().starts_with("scores:"));

    assert_eq!(source.scans_opened(), 1);
    assert_eq!(source.scans_finalized(), 1);
    assert_eq!(dict.query_count(), 0);
}

/// Finalize errors on the normal path are returned to the caller.
#[test]
fn test_finalize_error_is_reported() {
    let source = FailingSuffixSource::default();
    let attempts = Arc::clone(&source.finalize_attempts);
    let dict = build(Box::new(source));

    let err = dict.get::<i32>("score", &[1], Defaults::Null).unwrap_err();
    assert_eq!(err.code(), "DICT_SOURCE_FAILED");
    assert!(err.to_string().contains("cannot close connection"));
    assert_eq!(attempts.load(Ordering::Relaxed), 1);
}

// =============================================================================
// Data Shape Tests
// =============================================================================

/// A source value of the wrong variant is a source error with context.
#[test]
fn test_wrong_variant_is_column_type_mismatch() {
    let source = MemorySource::new(vec![score_block(vec![1], vec![Value::String("high".into())])]);
    let dict = build(Box::new(source.clone()));

    let err = dict.get::<i32>("score", &[1], Defaults::Null).unwrap_err();
    assert_eq!(err.code(), "DICT_COLUMN_TYPE_MISMATCH");
    assert_eq!(err.kind(), ErrorKind::Source);
    assert!(err.to_string().contains("score"));
    assert_eq!(source.scans_finalized(), 1);
}

/// Existence ignores attribute values entirely.
#[test]
fn test_has_ignores_values() {
    let source = MemorySource::new(vec![score_block(vec![3], vec![Value::String("x".into())])]);
    let dict = build(Box::new(source));

    assert_eq!(dict.has(&[3, 4]).unwrap(), vec![true, false]);
}

/// Enumeration keeps scan order and duplicates.
#[test]
fn test_get_ids_keeps_order_and_duplicates() {
    let source = MemorySource::new(vec![
        score_block(vec![5, 3], vec![Value::Int32(0), Value::Int32(0)]),
        score_block(vec![5], vec![Value::Int32(0)]),
        score_block(vec![], vec![]),
    ]);
    let dict = build(Box::new(source));

    assert_eq!(dict.get_ids().unwrap(), vec![5, 3, 5]);
}
