use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::error_handling::types::ParseError;
use crate::log_input::types::RawRecord;

/// Reader for delimited request logs.
///
/// The first line of the input names the columns, in any order. The reader
/// resolves the positions of the configured key column and the `date` and
/// `time` columns from it, then yields one [`RawRecord`] per subsequent
/// non-empty line.
///
/// Quoting is not interpreted: fields are split on the delimiter as-is.
#[derive(Debug)]
pub struct LogReader<R: BufRead> {
    reader: R,
    delimiter: char,
    key_index: usize,
    date_index: usize,
    time_index: usize,
    line_number: usize,
    records_read: usize,
}

impl LogReader<BufReader<File>> {
    /// Opens a log file and consumes its header line.
    pub fn open<P: AsRef<Path>>(
        path: P,
        delimiter: char,
        key_field: &str,
    ) -> Result<Self, ParseError> {
        let file = File::open(path.as_ref()).map_err(ParseError::ReadFailed)?;
        info!("Reading log from {}", path.as_ref().display());
        Self::new(BufReader::new(file), delimiter, key_field)
    }
}

impl<R: BufRead> LogReader<R> {
    /// Wraps an already-open source and consumes its header line.
    pub fn new(mut reader: R, delimiter: char, key_field: &str) -> Result<Self, ParseError> {
        let mut header = String::new();
        let read = reader
            .read_line(&mut header)
            .map_err(ParseError::ReadFailed)?;
        if read == 0 {
            return Err(ParseError::EmptyInput);
        }

        let columns: Vec<&str> = header.trim_end_matches(['\r', '\n']).split(delimiter).collect();
        let position = |name: &str| -> Result<usize, ParseError> {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
        };

        let key_index = position(key_field)?;
        let date_index = position("date")?;
        let time_index = position("time")?;
        debug!(
            "Header resolved: {} columns, key '{}' at {}",
            columns.len(),
            key_field,
            key_index
        );

        Ok(Self {
            reader,
            delimiter,
            key_index,
            date_index,
            time_index,
            line_number: 1,
            records_read: 0,
        })
    }

    /// Returns the next record, or `None` once the input is exhausted.
    /// Blank lines (such as a trailing newline) are skipped.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, ParseError> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(ParseError::ReadFailed)?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                continue;
            }

            let fields: Vec<&str> = trimmed.split(self.delimiter).collect();
            let field = |index: usize| -> Result<String, ParseError> {
                fields
                    .get(index)
                    .map(|f| f.to_string())
                    .ok_or(ParseError::ShortLine {
                        line: self.line_number,
                    })
            };

            let record = RawRecord {
                key: field(self.key_index)?,
                date: field(self.date_index)?,
                time: field(self.time_index)?,
                line_number: self.line_number,
            };
            self.records_read += 1;
            return Ok(Some(record));
        }
    }

    pub fn records_read(&self) -> usize {
        self.records_read
    }
}
