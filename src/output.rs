//! Entry output: the sink trait and its file-backed implementation.

/// Submodule for the file-backed sink.
pub mod file_sink;
/// Submodule for the sink trait and the in-memory test sink.
pub mod sink;
