use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadPeriodFormat(String),
    BadDelimiter(String),
    NotInRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadPeriodFormat(e) => write!(f, "Inactivity period error: {}", e),
            ConfigError::BadDelimiter(e) => write!(f, "Delimiter error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while turning raw input lines into cleaned records.
///
/// A `ParseError` is fatal for the whole run: there is no per-record
/// recovery, a malformed line aborts processing and any still-open sessions
/// are lost.
#[derive(Debug)]
pub enum ParseError {
    ReadFailed(std::io::Error),
    EmptyInput,
    MissingColumn(String),
    ShortLine { line: usize },
    BadTimestamp { line: usize, value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ReadFailed(e) => write!(f, "Failed to read input: {}", e),
            ParseError::EmptyInput => write!(f, "Input has no header line"),
            ParseError::MissingColumn(name) => {
                write!(f, "Header does not contain a '{}' column", name)
            }
            ParseError::ShortLine { line } => {
                write!(f, "Line {} has fewer fields than the header", line)
            }
            ParseError::BadTimestamp { line, value } => {
                write!(f, "Line {}: cannot parse timestamp from '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub enum SinkError {
    CreateFailed(std::io::Error),
    WriteFailed(std::io::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::CreateFailed(e) => write!(f, "Failed to create output: {}", e),
            SinkError::WriteFailed(e) => write!(f, "Failed to write entry: {}", e),
        }
    }
}

impl std::error::Error for SinkError {}

#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Parse(ParseError),
    Sink(SinkError),
    WriterStopped,
    WorkerFailed(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(e) => write!(f, "Configuration error: {}", e),
            PipelineError::Parse(e) => write!(f, "Parse error: {}", e),
            PipelineError::Sink(e) => write!(f, "Sink error: {}", e),
            PipelineError::WriterStopped => write!(f, "Output writer stopped unexpectedly"),
            PipelineError::WorkerFailed(e) => write!(f, "Worker task failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}
