use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use log::{debug, trace};

use crate::error_handling::types::ParseError;
use crate::log_input::types::RawRecord;
use crate::session_engine::entry_builder;
use crate::session_engine::finalizer;
use crate::session_engine::session_buffer::SessionBuffer;
use crate::session_engine::types::{Entry, Record};

/// Routes the record stream into per-key session buffers and drives the
/// inactivity sweep.
///
/// The sweep is driven by log time: each incoming record's timestamp acts as
/// the current virtual clock for every tracked buffer. The dispatcher
/// therefore expects records in non-decreasing timestamp order. That
/// precondition is not enforced; a regressing timestamp is noted at debug
/// level and processed as-is.
///
/// Buffers are tracked in an explicit key discovery order (first appearance
/// in the input), which governs both the sweep iteration order (the
/// tie-break when several buffers close on the same record) and the
/// finalization tie-break index. Ordering is a stated invariant here, not a
/// property inherited from map iteration.
pub struct Dispatcher {
    buffers: HashMap<String, SessionBuffer>,
    key_order: Vec<String>,
    period: Duration,
    datetime_format: String,
    last_seen: Option<NaiveDateTime>,
}

impl Dispatcher {
    /// `inactivity_secs` must already be validated by the configuration
    /// loader (1..=86400).
    pub fn new(inactivity_secs: i64, datetime_format: &str) -> Self {
        Self {
            buffers: HashMap::new(),
            key_order: Vec::new(),
            period: Duration::seconds(inactivity_secs),
            datetime_format: datetime_format.to_string(),
            last_seen: None,
        }
    }

    /// Processes one raw record: clean, route, append, then sweep.
    ///
    /// Returns the entries of every session this record closed, in detection
    /// order (key discovery order at the moment of the sweep). These are the
    /// streaming-phase emissions and must reach the sink before any
    /// finalization entry.
    ///
    /// A record whose date/time pair does not parse aborts the run; buffered
    /// sessions are not recoverable past this point.
    pub fn process(&mut self, raw: RawRecord) -> Result<Vec<Entry>, ParseError> {
        let record = Record::clean(raw, &self.datetime_format)?;
        let now = record.timestamp;

        if let Some(last) = self.last_seen {
            if now < last {
                debug!(
                    "Timestamp regression in input: {} after {} (key {})",
                    now, last, record.key
                );
            }
        }
        self.last_seen = Some(now);

        self.route(record);
        Ok(self.sweep(now))
    }

    /// Appends the record to its key's buffer, creating the buffer with the
    /// next creation index on first sight of the key.
    fn route(&mut self, record: Record) {
        if !self.buffers.contains_key(&record.key) {
            let creation_index = self.key_order.len();
            debug!("New key '{}' (creation index {})", record.key, creation_index);
            self.key_order.push(record.key.clone());
            self.buffers.insert(
                record.key.clone(),
                SessionBuffer::new(record.key.clone(), creation_index),
            );
        }

        if let Some(buffer) = self.buffers.get_mut(&record.key) {
            buffer.add(record);
        }
    }

    /// Scans every tracked buffer, including the one just appended to, and
    /// flushes each one whose inactivity gap is strictly exceeded at `now`.
    fn sweep(&mut self, now: NaiveDateTime) -> Vec<Entry> {
        let mut closed = Vec::new();

        let buffers = &mut self.buffers;
        for key in &self.key_order {
            if let Some(buffer) = buffers.get_mut(key) {
                if let Some(records) = buffer.flush(now, self.period) {
                    let entry = entry_builder::build(&records);
                    trace!(
                        "Session closed for '{}': {} records, gap crossed at {}",
                        entry.key,
                        entry.count,
                        now
                    );
                    closed.push(entry);
                }
            }
        }

        closed
    }

    /// Force-flushes all remaining open sessions, sorted by
    /// `(start, creation index)`. Call exactly once, after the input is
    /// exhausted; the returned entries follow every streaming-phase entry in
    /// the output.
    pub fn finalize(&mut self) -> Vec<Entry> {
        let batch = finalizer::drain_open_sessions(&mut self.buffers, &self.key_order);
        debug!("Finalized {} open sessions", batch.len());
        batch
    }

    /// Number of distinct keys seen so far. Buffers persist for the run even
    /// once drained.
    pub fn tracked_keys(&self) -> usize {
        self.key_order.len()
    }
}
