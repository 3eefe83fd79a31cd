//! Session reconstruction core.
//!
//! Rebuilds per-key sessions from a chronologically ordered record stream:
//! records sharing a key with no inter-record gap exceeding the inactivity
//! period form one session. The sweep that detects inactivity is driven by
//! the timestamps of incoming records, never by wall-clock time.
//!
//! Output happens in two phases: sessions detected mid-stream are emitted
//! immediately in detection order, and sessions still open at end of input
//! are emitted afterwards as one batch sorted by start time (key discovery
//! order breaking ties).

/// Submodule for the per-record routing and sweep logic.
pub mod dispatcher;
/// Submodule for converting flushed sessions into entries.
pub mod entry_builder;
/// Submodule for the end-of-stream drain and batch ordering.
pub mod finalizer;
/// Submodule for the per-key record accumulator.
pub mod session_buffer;
/// Submodule for record and entry types.
pub mod types;
