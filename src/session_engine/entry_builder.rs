use crate::session_engine::types::{Entry, Record};

/// Converts a flushed session into its summary entry.
///
/// Pure transformation, no side effects. `records` must be non-empty and
/// share a single key, which both flush paths guarantee.
///
/// Duration is inclusive of both boundary seconds: whole seconds between
/// first and last record plus one, so a single-record session lasts 1.
pub fn build(records: &[Record]) -> Entry {
    let first = &records[0];
    let last = &records[records.len() - 1];

    Entry {
        key: first.key.clone(),
        start: first.timestamp,
        end: last.timestamp,
        duration_secs: (last.timestamp - first.timestamp).num_seconds() + 1,
        count: records.len(),
    }
}
