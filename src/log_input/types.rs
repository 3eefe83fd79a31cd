/// One not-yet-cleaned input line, reduced to the fields the engine needs.
///
/// The reader resolves column positions from the header line once, then
/// extracts the key, date and time fields per data line. Remaining columns
/// are passthrough data and are dropped at this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub key: String,
    pub date: String,
    pub time: String,
    /// 1-based line number in the input file, for error reporting.
    pub line_number: usize,
}
