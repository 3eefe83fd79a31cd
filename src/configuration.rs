//! Runtime configuration: command-line arguments, the optional TOML
//! settings file and the inactivity period file, merged and validated into
//! one [`config::Config`] value passed to the pipeline.

/// Submodule for argument parsing and configuration resolution.
pub mod config;
/// Submodule for settings-file types.
pub mod types;
