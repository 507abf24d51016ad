//! Scoped scan sessions
//!
//! A [`Scan`] owns one source session. `finish` finalizes it and reports the
//! outcome. Any other exit (an error mid-scan, an early return) finalizes it
//! on drop. A session is finalized exactly once.

use crate::observability::{log_event_at, Event, Severity};
use crate::source::{Block, DictionarySource, ScanSession, SourceResult};

/// Totals of one completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ScanSummary {
    pub blocks: u64,
    pub rows: u64,
}

pub(crate) struct Scan<'a> {
    session: Box<dyn ScanSession + 'a>,
    dictionary: &'a str,
    finalized: bool,
    summary: ScanSummary,
}

impl<'a> Scan<'a> {
    /// Opens a session and reads its prefix
    pub fn open(source: &'a dyn DictionarySource, dictionary: &'a str) -> SourceResult<Self> {
        let session = source.open_scan()?;
        let mut scan = Scan {
            session,
            dictionary,
            finalized: false,
            summary: ScanSummary::default(),
        };
        scan.session.read_prefix()?;

        log_event_at(
            Severity::Trace,
            Event::ScanOpened,
            &[("dictionary", dictionary)],
        );
        Ok(scan)
    }

    /// Returns the next block, or `None` at the end of the source
    pub fn next_block(&mut self) -> SourceResult<Option<Block>> {
        let block = self.session.read()?;
        if let Some(block) = &block {
            self.summary.blocks += 1;
            self.summary.rows += block.rows() as u64;
        }
        Ok(block)
    }

    /// Finalizes the session, surfacing finalize errors
    pub fn finish(mut self) -> SourceResult<ScanSummary> {
        self.finalized = true;
        self.session.read_suffix()?;

        let blocks = self.summary.blocks.to_string();
        let rows = self.summary.rows.to_string();
        log_event_at(
            Severity::Trace,
            Event::ScanFinished,
            &[
                ("dictionary", self.dictionary),
                ("blocks", &blocks),
                ("rows", &rows),
            ],
        );
        Ok(self.summary)
    }
}

impl Drop for Scan<'_> {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        if let Err(e) = self.session.read_suffix() {
            let reason = e.to_string();
            log_event_at(
                Severity::Warn,
                Event::ScanFinalizeFailed,
                &[("dictionary", self.dictionary), ("reason", &reason)],
            );
        }
    }
}
