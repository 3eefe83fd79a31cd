use serde::Deserialize;
use std::path::PathBuf;

/// Optional settings file contents, TOML.
///
/// Every field may be omitted; values present here take precedence over the
/// corresponding command-line options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSettings {
    /// strftime pattern used both to parse date+time fields and to render
    /// entry timestamps.
    pub datetime_format: Option<String>,
    /// Name of the header column holding the session key.
    pub key_field: Option<String>,
    /// Field delimiter, a single character.
    pub delimiter: Option<String>,
    /// Output file path.
    pub output: Option<PathBuf>,
}
