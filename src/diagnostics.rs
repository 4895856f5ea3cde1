//! Diagnostic sink passed into the schema extractor and chart builder.
//!
//! Components never log through a global directly. They receive a
//! `&dyn Diagnostics`, which defaults to [`TracingDiagnostics`] and can be
//! swapped for [`RecordingDiagnostics`] when the emitted messages matter.

use std::sync::Mutex;

pub use tracing::Level;

/// Leveled, fire-and-forget log sink.
///
/// Implementations must not panic: callers use this on recovery paths.
pub trait Diagnostics {
    /// Emit a message at the given level
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Forwards every message to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "chartform", "{}", message),
            Level::WARN => tracing::warn!(target: "chartform", "{}", message),
            Level::INFO => tracing::info!(target: "chartform", "{}", message),
            Level::DEBUG => tracing::debug!(target: "chartform", "{}", message),
            _ => tracing::trace!(target: "chartform", "{}", message),
        }
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<(Level, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(level, message)` pairs, oldest first
    pub fn records(&self) -> Vec<(Level, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of messages recorded at exactly `level`
    pub fn count(&self, level: Level) -> usize {
        self.records()
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .count()
    }

    /// Messages recorded at exactly `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn log(&self, level: Level, message: &str) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_diagnostics_counts_by_level() {
        let sink = RecordingDiagnostics::new();
        sink.warn("first");
        sink.error("second");
        sink.warn("third");
        sink.debug("fourth");

        assert_eq!(sink.count(Level::WARN), 2);
        assert_eq!(sink.count(Level::ERROR), 1);
        assert_eq!(sink.count(Level::INFO), 0);
        assert_eq!(sink.messages(Level::WARN), vec!["first", "third"]);
        assert_eq!(sink.records().len(), 4);
    }

    #[test]
    fn test_tracing_diagnostics_without_subscriber() {
        // No subscriber installed: must be a silent no-op
        let sink = TracingDiagnostics;
        sink.error("nobody is listening");
        sink.log(Level::TRACE, "still fine");
    }
}
