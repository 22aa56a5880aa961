use crate::domain::ports::Diagnostics;
use std::cell::RefCell;

/// Forwards diagnostics to the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: RefCell<Vec<DiagnosticEntry>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self, level: DiagnosticLevel) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(DiagnosticLevel::Error)
    }

    fn push(&self, level: DiagnosticLevel, message: &str) {
        self.entries.borrow_mut().push(DiagnosticEntry {
            level,
            message: message.to_string(),
        });
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.push(DiagnosticLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(DiagnosticLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order_and_level() {
        let diagnostics = RecordingDiagnostics::new();
        diagnostics.info("conversion started");
        diagnostics.error("failed to process item A-2");
        diagnostics.info("conversion finished");

        let entries = diagnostics.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].level, DiagnosticLevel::Error);
        assert_eq!(diagnostics.errors(), vec!["failed to process item A-2".to_string()]);
        assert_eq!(diagnostics.messages(DiagnosticLevel::Info).len(), 2);
    }
}
