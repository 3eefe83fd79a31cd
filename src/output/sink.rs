use crate::error_handling::types::SinkError;
use crate::session_engine::types::Entry;

/// Interface for session entry sinks.
///
/// Implementors receive entries in final output order (streaming phase
/// first, then the sorted finalization batch) and must preserve it.
pub trait EntrySink: Send {
    /// Appends one entry to the output.
    fn write_entry(&mut self, entry: &Entry) -> Result<(), SinkError>;

    /// Flushes any buffered output. Called once, after the last entry.
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// Sink that collects entries in memory, for tests and embedding.
#[derive(Default)]
pub struct MemorySink {
    pub entries: Vec<Entry>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntrySink for MemorySink {
    fn write_entry(&mut self, entry: &Entry) -> Result<(), SinkError> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
