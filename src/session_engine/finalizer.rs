use std::collections::HashMap;

use crate::session_engine::entry_builder;
use crate::session_engine::session_buffer::SessionBuffer;
use crate::session_engine::types::Entry;

/// Drains every still-open session at end of stream and imposes a
/// deterministic cross-key order on the resulting batch.
///
/// Sessions still open when the input ends have no natural discovery order,
/// so the batch is sorted by start timestamp, with the buffer's creation
/// index (order of first appearance of the key in the input) as a pure
/// tie-break for coinciding starts.
pub fn drain_open_sessions(
    buffers: &mut HashMap<String, SessionBuffer>,
    key_order: &[String],
) -> Vec<Entry> {
    let mut batch: Vec<(usize, Entry)> = Vec::new();

    for key in key_order {
        if let Some(buffer) = buffers.get_mut(key) {
            if let Some(records) = buffer.force_flush() {
                batch.push((buffer.creation_index(), entry_builder::build(&records)));
            }
        }
    }

    batch.sort_by_key(|(creation_index, entry)| (entry.start, *creation_index));
    batch.into_iter().map(|(_, entry)| entry).collect()
}
