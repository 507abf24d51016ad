//! Dictionary instrumentation
//!
//! - Counters only, monotonic, no reset
//! - Relaxed atomics: increments from concurrent queries never lose counts,
//!   no ordering is implied between counters
//! - Byte accounting is fixed at construction

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters owned by one dictionary instance
#[derive(Debug, Default)]
pub struct DictionaryMetrics {
    /// Request rows processed by lookups, existence and ancestry queries
    query_count: AtomicU64,
    /// Scan sessions opened against the source
    scans_opened: AtomicU64,
    /// Source rows read by completed scans
    rows_scanned: AtomicU64,
    /// Static size estimate computed at construction
    bytes_allocated: u64,
}

impl DictionaryMetrics {
    /// Creates a registry with all counters at zero
    pub fn new(bytes_allocated: u64) -> Self {
        Self {
            bytes_allocated,
            ..Self::default()
        }
    }

    /// Adds processed request rows to the query counter
    pub fn add_queries(&self, rows: u64) {
        self.query_count.fetch_add(rows, Ordering::Relaxed);
    }

    /// Increment scans opened
    pub fn increment_scans_opened(&self) {
        self.scans_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds source rows read by a completed scan
    pub fn add_rows_scanned(&self, rows: u64) {
        self.rows_scanned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }

    pub fn scans_opened(&self) -> u64 {
        self.scans_opened.load(Ordering::Relaxed)
    }

    pub fn rows_scanned(&self) -> u64 {
        self.rows_scanned.load(Ordering::Relaxed)
    }

    pub fn bytes_allocated(&self) -> u64 {
        self.bytes_allocated
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            query_count: self.query_count(),
            scans_opened: self.scans_opened(),
            rows_scanned: self.rows_scanned(),
            bytes_allocated: self.bytes_allocated,
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub query_count: u64,
    pub scans_opened: u64,
    pub rows_scanned: u64,
    pub bytes_allocated: u64,
}
