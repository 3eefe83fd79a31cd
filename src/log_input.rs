//! Delimited log input: header-driven field lookup and per-line record
//! extraction. Parsing stops at raw string fields; combining date and time
//! into a timestamp happens in the session engine, once per record.

/// Submodule for the log file reader.
pub mod reader;
/// Submodule for raw record types.
pub mod types;
