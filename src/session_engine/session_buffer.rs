use std::collections::VecDeque;

use chrono::{Duration, NaiveDateTime};

use crate::session_engine::types::Record;

/// Per-key accumulator of not-yet-flushed records.
///
/// One buffer exists per distinct key, created on first sight of the key and
/// kept for the entire run; after a flush the emptied buffer is reused for
/// the key's next session. A buffer is either empty or holds exactly the
/// records of one still-open session: every flush drains it completely, so a
/// key never has two open sessions at once.
///
/// Records are stored in arrival order. They are in non-decreasing timestamp
/// order whenever the input stream is, which the engine assumes but does not
/// enforce.
pub struct SessionBuffer {
    key: String,
    records: VecDeque<Record>,
    creation_index: usize,
}

impl SessionBuffer {
    pub fn new(key: String, creation_index: usize) -> Self {
        Self {
            key,
            records: VecDeque::new(),
            creation_index,
        }
    }

    /// Appends a cleaned record. Never fails on well-formed input.
    pub fn add(&mut self, record: Record) {
        self.records.push_back(record);
    }

    /// Drains and returns the open session if the inactivity gap has been
    /// crossed, measured against `now` (the latest record timestamp seen by
    /// the dispatcher, not wall-clock time).
    ///
    /// The gap test is strict: a gap exactly equal to `period` does not
    /// close the session. Returns `None` and leaves the buffer untouched
    /// when the buffer is empty or the gap has not been exceeded.
    pub fn flush(&mut self, now: NaiveDateTime, period: Duration) -> Option<Vec<Record>> {
        let last = self.records.back()?.timestamp;
        if now - last > period {
            Some(self.records.drain(..).collect())
        } else {
            None
        }
    }

    /// Drains and returns the open session unconditionally, ignoring the gap
    /// condition. Used only at end of stream; equivalent to flushing against
    /// an infinitely distant "now".
    pub fn force_flush(&mut self) -> Option<Vec<Record>> {
        if self.records.is_empty() {
            None
        } else {
            Some(self.records.drain(..).collect())
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn creation_index(&self) -> usize {
        self.creation_index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
