//! In-memory source
//!
//! Serves a fixed list of blocks on every scan. Tracks how many sessions were
//! opened and finalized so callers can verify the scan discipline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::block::Block;
use super::errors::{SourceError, SourceResult};
use super::session::{DictionarySource, ScanSession};

#[derive(Debug, Default)]
struct SessionCounters {
    opened: AtomicU64,
    finalized: AtomicU64,
}

/// A source backed by blocks held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    blocks: Arc<Vec<Block>>,
    counters: Arc<SessionCounters>,
    /// Block index at which `read` fails, if any
    fail_at: Option<usize>,
}

impl MemorySource {
    /// Creates a source that yields `blocks` in order on every scan
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks: Arc::new(blocks),
            counters: Arc::new(SessionCounters::default()),
            fail_at: None,
        }
    }

    /// Makes every scan fail when it reaches block `index`
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Returns the blocks served by this source
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of sessions opened so far
    pub fn scans_opened(&self) -> u64 {
        self.counters.opened.load(Ordering::Relaxed)
    }

    /// Number of sessions finalized so far
    pub fn scans_finalized(&self) -> u64 {
        self.counters.finalized.load(Ordering::Relaxed)
    }
}

impl DictionarySource for MemorySource {
    fn open_scan(&self) -> SourceResult<Box<dyn ScanSession + '_>> {
        Ok(Box::new(MemoryScan {
            source: self,
            position: 0,
        }))
    }

    fn describe(&self) -> String {
        format!("memory ({} blocks)", self.blocks.len())
    }

    fn clone_source(&self) -> Box<dyn DictionarySource> {
        Box::new(MemorySource {
            blocks: Arc::clone(&self.blocks),
            counters: Arc::new(SessionCounters::default()),
            fail_at: self.fail_at,
        })
    }
}

struct MemoryScan<'a> {
    source: &'a MemorySource,
    position: usize,
}

impl ScanSession for MemoryScan<'_> {
    fn read_prefix(&mut self) -> SourceResult<()> {
        self.source.counters.opened.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn read(&mut self) -> SourceResult<Option<Block>> {
        if self.source.fail_at == Some(self.position) {
            return Err(SourceError::Failed(format!(
                "injected failure at block {}",
                self.position
            )));
        }

        let block = self.source.blocks.get(self.position).cloned();
        self.position += 1;
        Ok(block)
    }

    fn read_suffix(&mut self) -> SourceResult<()> {
        self.source.counters.finalized.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
