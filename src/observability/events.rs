//! Observable events for directdict
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Dictionary constructed and ready for queries
    DictionaryCreated,
    /// Configuration file loaded
    ConfigLoaded,

    // Scans
    /// Scan session opened against the source
    ScanOpened,
    /// Scan session finalized after the last block
    ScanFinished,
    /// Finalizing an abandoned scan session failed
    ScanFinalizeFailed,

    // Queries
    /// A lookup, existence or ancestry query completed
    LookupComplete,
    /// An ancestry walk hit the depth bound
    HierarchyDepthExhausted,
    /// A block stream was created for downstream export
    BlockStreamOpened,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DictionaryCreated => "DICTIONARY_CREATED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ScanOpened => "SCAN_OPENED",
            Event::ScanFinished => "SCAN_FINISHED",
            Event::ScanFinalizeFailed => "SCAN_FINALIZE_FAILED",
            Event::LookupComplete => "LOOKUP_COMPLETE",
            Event::HierarchyDepthExhausted => "HIERARCHY_DEPTH_EXHAUSTED",
            Event::BlockStreamOpened => "BLOCK_STREAM_OPENED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::DictionaryCreated,
            Event::ConfigLoaded,
            Event::ScanOpened,
            Event::ScanFinished,
            Event::ScanFinalizeFailed,
            Event::LookupComplete,
            Event::HierarchyDepthExhausted,
            Event::BlockStreamOpened,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::ScanOpened), "SCAN_OPENED");
    }
}
