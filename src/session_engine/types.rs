use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error_handling::types::ParseError;
use crate::log_input::types::RawRecord;

/// A cleaned input record, ready for sessionization.
///
/// Produced exactly once per input line by [`Record::clean`] and never
/// mutated afterwards. Fields of the input line other than the key and the
/// date/time pair are passthrough data the engine does not look at, so they
/// are not carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Grouping identifier, e.g. an originating address.
    pub key: String,
    /// Timestamp combined from the line's date and time fields.
    pub timestamp: NaiveDateTime,
}

impl Record {
    /// Combines the raw date and time fields into a single timestamp under
    /// the configured parse pattern.
    ///
    /// The log carries no timezone information, so timestamps stay naive.
    /// A date/time pair that does not match the pattern fails the whole run,
    /// there is no per-record skip.
    pub fn clean(raw: RawRecord, datetime_format: &str) -> Result<Record, ParseError> {
        let combined = format!("{} {}", raw.date, raw.time);
        let timestamp = NaiveDateTime::parse_from_str(&combined, datetime_format).map_err(
            |_| ParseError::BadTimestamp {
                line: raw.line_number,
                value: combined.clone(),
            },
        )?;

        Ok(Record {
            key: raw.key,
            timestamp,
        })
    }
}

/// Summary of one completed session, write-once.
///
/// `duration_secs` uses inclusive-second semantics: the session occupies the
/// full second of both its first and last record, so a single-record session
/// has a duration of 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_secs: i64,
    pub count: usize,
}

impl Entry {
    /// Renders the entry as one output line:
    /// `{key},{start},{end},{duration},{count}` with both timestamps
    /// formatted under the same pattern used for parsing.
    pub fn format_line(&self, datetime_format: &str) -> String {
        format!(
            "{},{},{},{},{}",
            self.key,
            self.start.format(datetime_format),
            self.end.format(datetime_format),
            self.duration_secs,
            self.count
        )
    }
}
