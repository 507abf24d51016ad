//! Observability subsystem for directdict
//!
//! This module provides:
//! - Structured logging (JSON lines on stderr)
//! - Per-dictionary counters
//! - Typed lifecycle and query events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No async or background threads
//!
//! # Usage
//!
//! ```ignore
//! use directdict::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Warn);
//! log_event_with_fields(Event::ConfigLoaded, &[("path", "geo.json")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{DictionaryMetrics, MetricsSnapshot};

/// Log a lifecycle event at INFO
pub fn log_event(event: Event) {
    Logger::info(event.as_str(), &[]);
}

/// Log an event with fields at the given severity
pub fn log_event_at(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}

/// Log a lifecycle event with fields at INFO
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    log_event_at(Severity::Info, event, fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::DictionaryCreated);
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/geo.json")]);
        log_event_at(Severity::Trace, Event::ScanOpened, &[]);
    }
}
