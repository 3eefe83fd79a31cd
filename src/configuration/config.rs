use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};

use super::types::FileSettings;
use crate::error_handling::types::ConfigError;

/// Inactivity period domain, in seconds.
const PERIOD_MIN: i64 = 1;
const PERIOD_MAX: i64 = 86400;

/// Command-line arguments.
///
/// The two positional arguments mirror the classic sessionization challenge
/// layout: the log file itself and a one-line file holding the inactivity
/// period in seconds.
#[derive(Parser, Debug, Clone)]
#[command(name = "sessionize")]
#[command(version)]
#[command(about = "Reconstruct per-key sessions from a chronologically ordered request log")]
struct Args {
    /// Path to the delimited log file. The first line must be a header
    /// naming the columns.
    logfile: PathBuf,

    /// Path to a file whose first line is the inactivity period in seconds
    /// (1 to 86400).
    inactivity: PathBuf,

    /// Path to the output file.
    ///
    /// # Command Line
    /// Use `-o <PATH>` or `--output <PATH>` to set this value from the CLI
    #[arg(short, long, default_value = "sessionization.txt")]
    output: PathBuf,

    /// Field delimiter, a single character.
    ///
    /// # Command Line
    /// Use `-d <CHAR>` or `--delimiter <CHAR>` to set this value from the CLI
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// strftime pattern combining the `date` and `time` columns into a
    /// timestamp, also used to render timestamps in output entries.
    ///
    /// # Command Line
    /// Use `--datetime-format <PATTERN>` to set this value from the CLI
    #[arg(long, default_value = "%Y-%m-%d %H:%M:%S")]
    datetime_format: String,

    /// Name of the header column holding the session key.
    ///
    /// # Command Line
    /// Use `--key-field <NAME>` to set this value from the CLI
    #[arg(long, default_value = "ip")]
    key_field: String,

    /// Optional TOML settings file; values present there override the
    /// command-line options above (but not the positional paths).
    ///
    /// # Command Line
    /// Use `--config <PATH>` to set this value from the CLI
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Resolved runtime configuration handed to the pipeline.
///
/// All validation happens here; the session engine trusts these values.
#[derive(Debug, Clone)]
pub struct Config {
    pub logfile: PathBuf,
    pub output: PathBuf,
    pub delimiter: char,
    pub datetime_format: String,
    pub key_field: String,
    /// Inactivity threshold in seconds, validated to 1..=86400.
    pub inactivity_secs: i64,
}

impl Config {
    /// Builds the configuration from the process command line, loading the
    /// inactivity file and the optional settings file along the way.
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::resolve(Args::parse())
    }

    fn resolve(args: Args) -> Result<Self, ConfigError> {
        let settings = match &args.config {
            Some(path) => {
                info!("Loading settings file {}", path.display());
                Self::load_settings(path)?
            }
            None => FileSettings::default(),
        };

        let inactivity_secs = Self::load_inactivity_period(&args.inactivity)?;

        let delimiter_str = settings.delimiter.unwrap_or(args.delimiter);
        let mut chars = delimiter_str.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(ConfigError::BadDelimiter(format!(
                    "'{}' is not a single character",
                    delimiter_str
                )))
            }
        };

        Ok(Config {
            logfile: args.logfile,
            output: settings.output.unwrap_or(args.output),
            delimiter,
            datetime_format: settings.datetime_format.unwrap_or(args.datetime_format),
            key_field: settings.key_field.unwrap_or(args.key_field),
            inactivity_secs,
        })
    }

    fn load_settings(path: &Path) -> Result<FileSettings, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::IoError)?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Reads the inactivity period file: first line, trimmed, integer
    /// seconds, validated against the documented 1..=86400 domain.
    fn load_inactivity_period(path: &Path) -> Result<i64, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::IoError)?;
        let first_line = content.lines().next().unwrap_or("").trim();
        let period: i64 = first_line.parse().map_err(|_| {
            ConfigError::BadPeriodFormat(format!("'{}' is not an integer", first_line))
        })?;

        if !(PERIOD_MIN..=PERIOD_MAX).contains(&period) {
            return Err(ConfigError::NotInRange(format!(
                "inactivity period {} outside {}..={}",
                period, PERIOD_MIN, PERIOD_MAX
            )));
        }

        debug!("Inactivity period: {}s", period);
        Ok(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        write!(f, "{}", content).unwrap();
        path
    }

    fn args_for(logfile: &Path, inactivity: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            "sessionize".to_string(),
            logfile.display().to_string(),
            inactivity.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap_or_else(|e| panic!("{}", e))
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "log.csv", "ip,date,time\n");
        let inactivity = write_file(&dir, "inactivity.txt", "2\n");

        let config = Config::resolve(args_for(&log, &inactivity, &[])).unwrap();

        assert_eq!(config.output, PathBuf::from("sessionization.txt"));
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.key_field, "ip");
        assert_eq!(config.inactivity_secs, 2);
    }

    #[test]
    fn test_period_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "log.csv", "ip,date,time\n");

        for bad in ["0", "86401", "-5"] {
            let inactivity = write_file(&dir, "inactivity.txt", bad);
            let err = Config::resolve(args_for(&log, &inactivity, &[])).unwrap_err();
            assert!(matches!(err, ConfigError::NotInRange(_)), "period {}", bad);
        }
    }

    #[test]
    fn test_period_not_an_integer() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "log.csv", "ip,date,time\n");
        let inactivity = write_file(&dir, "inactivity.txt", "soon\n");

        let err = Config::resolve(args_for(&log, &inactivity, &[])).unwrap_err();
        assert!(matches!(err, ConfigError::BadPeriodFormat(_)));
    }

    #[test]
    fn test_bad_delimiter_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "log.csv", "ip,date,time\n");
        let inactivity = write_file(&dir, "inactivity.txt", "2\n");

        let err =
            Config::resolve(args_for(&log, &inactivity, &["--delimiter", "ab"])).unwrap_err();
        assert!(matches!(err, ConfigError::BadDelimiter(_)));
    }

    #[test]
    fn test_settings_file_overrides_cli_options() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "log.csv", "ip,date,time\n");
        let inactivity = write_file(&dir, "inactivity.txt", "60\n");
        let settings = write_file(
            &dir,
            "settings.toml",
            "key_field = \"addr\"\ndelimiter = \";\"\n",
        );

        let config = Config::resolve(args_for(
            &log,
            &inactivity,
            &["--config", settings.to_str().unwrap(), "--key-field", "ip"],
        ))
        .unwrap();

        assert_eq!(config.key_field, "addr");
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.inactivity_secs, 60);
    }

    #[test]
    fn test_settings_file_must_be_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let log = write_file(&dir, "log.csv", "ip,date,time\n");
        let inactivity = write_file(&dir, "inactivity.txt", "2\n");
        let settings = write_file(&dir, "settings.toml", "key_field = [unterminated\n");

        let err = Config::resolve(args_for(
            &log,
            &inactivity,
            &["--config", settings.to_str().unwrap()],
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }
}
