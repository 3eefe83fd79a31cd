use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{error, info};

use crate::error_handling::types::SinkError;
use crate::output::sink::EntrySink;
use crate::session_engine::types::Entry;

/// Sink writing one formatted line per entry to a file.
pub struct FileSink {
    writer: BufWriter<File>,
    datetime_format: String,
    entries_written: usize,
}

impl FileSink {
    /// Creates (truncating) the output file.
    pub fn create<P: AsRef<Path>>(path: P, datetime_format: &str) -> Result<Self, SinkError> {
        let file = File::create(path.as_ref()).map_err(|e| {
            error!("Failed to create output file {}: {}", path.as_ref().display(), e);
            SinkError::CreateFailed(e)
        })?;
        info!("Writing entries to {}", path.as_ref().display());

        Ok(Self {
            writer: BufWriter::new(file),
            datetime_format: datetime_format.to_string(),
            entries_written: 0,
        })
    }

    pub fn entries_written(&self) -> usize {
        self.entries_written
    }
}

impl EntrySink for FileSink {
    fn write_entry(&mut self, entry: &Entry) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", entry.format_line(&self.datetime_format)).map_err(|e| {
            error!("Failed to write entry for '{}': {}", entry.key, e);
            SinkError::WriteFailed(e)
        })?;
        self.entries_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|e| {
            error!("Failed to flush output: {}", e);
            SinkError::WriteFailed(e)
        })
    }
}
