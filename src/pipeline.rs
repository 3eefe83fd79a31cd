//! Wires the log reader, the session engine and the entry sink together.
//!
//! The engine itself is strictly synchronous and runs on a blocking task;
//! only the sink write is decoupled, behind a single unbounded channel with
//! a single writer task, which keeps the two-phase emission order intact
//! (streaming entries in detection order, then the sorted finalization
//! batch).

use log::{error, info};
use tokio::sync::mpsc;
use tokio::task;

use crate::configuration::config::Config;
use crate::error_handling::types::{PipelineError, SinkError};
use crate::log_input::reader::LogReader;
use crate::output::file_sink::FileSink;
use crate::output::sink::EntrySink;
use crate::session_engine::dispatcher::Dispatcher;
use crate::session_engine::types::Entry;

/// Counters reported after a successful run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSummary {
    pub records_read: usize,
    pub distinct_keys: usize,
    pub entries_written: usize,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the full pipeline against the configured output file.
    pub async fn run(&self) -> Result<PipelineSummary, PipelineError> {
        let sink = FileSink::create(&self.config.output, &self.config.datetime_format)
            .map_err(PipelineError::Sink)?;
        let (summary, _sink) = self.run_with_sink(sink).await?;
        Ok(summary)
    }

    /// Runs the pipeline against an arbitrary sink and hands the sink back,
    /// which lets callers inspect collected entries.
    pub async fn run_with_sink<S: EntrySink + 'static>(
        &self,
        sink: S,
    ) -> Result<(PipelineSummary, S), PipelineError> {
        let (tx, rx) = mpsc::unbounded_channel::<Entry>();

        let writer = tokio::spawn(write_entries(rx, sink));
        let config = self.config.clone();
        let producer = task::spawn_blocking(move || process_log(&config, tx));

        let produced = producer
            .await
            .map_err(|e| PipelineError::WorkerFailed(e.to_string()))?;
        let written = writer
            .await
            .map_err(|e| PipelineError::WorkerFailed(e.to_string()))?;

        // A producer send failure means the writer went away first; surface
        // the writer's own error in that case.
        let (entries_written, sink) = written.map_err(PipelineError::Sink)?;
        let (records_read, distinct_keys) = produced?;

        let summary = PipelineSummary {
            records_read,
            distinct_keys,
            entries_written,
        };
        info!(
            "Processed {} records over {} keys, wrote {} entries",
            summary.records_read, summary.distinct_keys, summary.entries_written
        );
        Ok((summary, sink))
    }
}

/// Blocking side: read records, drive the dispatcher, push every emitted
/// entry into the writer channel. Dropping the sender at the end signals the
/// writer to finish.
fn process_log(
    config: &Config,
    tx: mpsc::UnboundedSender<Entry>,
) -> Result<(usize, usize), PipelineError> {
    let mut reader = LogReader::open(&config.logfile, config.delimiter, &config.key_field)
        .map_err(PipelineError::Parse)?;
    let mut dispatcher = Dispatcher::new(config.inactivity_secs, &config.datetime_format);

    while let Some(raw) = reader.next_record().map_err(PipelineError::Parse)? {
        for entry in dispatcher.process(raw).map_err(PipelineError::Parse)? {
            if tx.send(entry).is_err() {
                return Err(PipelineError::WriterStopped);
            }
        }
    }

    for entry in dispatcher.finalize() {
        if tx.send(entry).is_err() {
            return Err(PipelineError::WriterStopped);
        }
    }

    Ok((reader.records_read(), dispatcher.tracked_keys()))
}

/// Writer side: consume entries in channel order and append them to the
/// sink. A sink failure drops the receiver, which stops the producer.
async fn write_entries<S: EntrySink>(
    mut rx: mpsc::UnboundedReceiver<Entry>,
    mut sink: S,
) -> Result<(usize, S), SinkError> {
    let mut written = 0usize;
    while let Some(entry) = rx.recv().await {
        if let Err(e) = sink.write_entry(&entry) {
            error!("Stopping writer after failed entry: {}", e);
            return Err(e);
        }
        written += 1;
    }
    sink.flush()?;
    Ok((written, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sink::MemorySink;
    use std::fs;
    use std::io::Write;

    const LOGFILE: &str = "\
ip,date,time,zone,cik,accession,extention,code,size,idx,norefer,noagent,find,crawler,browser
101.81.133.jja,2017-06-30,00:00:00,0.0,1608552.0,0001047469-17-004337,-index.htm,200.0,80251.0,1.0,0.0,0.0,9.0,0.0,
107.23.85.jfd,2017-06-30,00:00:00,0.0,1027281.0,0000898430-02-001167,-index.htm,200.0,2825.0,1.0,0.0,0.0,10.0,0.0,
107.23.85.jfd,2017-06-30,00:00:00,0.0,1136894.0,0000905148-07-003827,-index.htm,200.0,3021.0,1.0,0.0,0.0,10.0,0.0,
107.23.85.jfd,2017-06-30,00:00:01,0.0,841535.0,0000841535-98-000002,-index.html,200.0,2699.0,1.0,0.0,0.0,10.0,0.0,
108.91.91.hbc,2017-06-30,00:00:01,0.0,1295391.0,0001209784-17-000052,.txt,200.0,19884.0,0.0,0.0,0.0,10.0,0.0,
106.120.173.jie,2017-06-30,00:00:02,0.0,1470683.0,0001144204-14-046448,v385454_20fa.htm,301.0,663.0,0.0,0.0,0.0,10.0,0.0,
107.178.195.aag,2017-06-30,00:00:02,0.0,1068124.0,0000350001-15-000854,-xbrl.zip,404.0,784.0,0.0,0.0,0.0,10.0,1.0,
107.23.85.jfd,2017-06-30,00:00:03,0.0,842814.0,0000842814-98-000001,-index.html,200.0,2690.0,1.0,0.0,0.0,10.0,0.0,
107.178.195.aag,2017-06-30,00:00:04,0.0,1068124.0,0000350001-15-000731,-xbrl.zip,404.0,784.0,0.0,0.0,0.0,10.0,1.0,
108.91.91.hbc,2017-06-30,00:00:04,0.0,1618174.0,0001140361-17-026711,.txt,301.0,674.0,0.0,0.0,0.0,10.0,0.0,
";

    const EXPECTED: &str = "\
101.81.133.jja,2017-06-30 00:00:00,2017-06-30 00:00:00,1,1
108.91.91.hbc,2017-06-30 00:00:01,2017-06-30 00:00:01,1,1
107.23.85.jfd,2017-06-30 00:00:00,2017-06-30 00:00:03,4,4
106.120.173.jie,2017-06-30 00:00:02,2017-06-30 00:00:02,1,1
107.178.195.aag,2017-06-30 00:00:02,2017-06-30 00:00:04,3,2
108.91.91.hbc,2017-06-30 00:00:04,2017-06-30 00:00:04,1,1
";

    fn fixture(dir: &tempfile::TempDir) -> Config {
        let logfile = dir.path().join("log.csv");
        let mut f = fs::File::create(&logfile).unwrap();
        write!(f, "{}", LOGFILE).unwrap();

        Config {
            logfile,
            output: dir.path().join("sessionization.txt"),
            delimiter: ',',
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            key_field: "ip".to_string(),
            inactivity_secs: 2,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(&dir);
        let output = config.output.clone();

        let summary = Pipeline::new(config).run().await.unwrap();
        assert_eq!(summary.records_read, 10);
        assert_eq!(summary.distinct_keys, 5);
        assert_eq!(summary.entries_written, 6);

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, EXPECTED);
    }

    #[tokio::test]
    async fn test_streaming_entries_precede_finalization_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(&dir);

        let (_, sink) = Pipeline::new(config)
            .run_with_sink(MemorySink::new())
            .await
            .unwrap();

        let keys: Vec<&str> = sink.entries.iter().map(|e| e.key.as_str()).collect();
        // First two closed mid-stream, the rest only at end of input; the
        // finalization batch is (start, discovery) sorted regardless of the
        // streamed entries' timestamps.
        assert_eq!(
            keys,
            [
                "101.81.133.jja",
                "108.91.91.hbc",
                "107.23.85.jfd",
                "106.120.173.jie",
                "107.178.195.aag",
                "108.91.91.hbc"
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_timestamp_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let logfile = dir.path().join("log.csv");
        let mut f = fs::File::create(&logfile).unwrap();
        write!(
            f,
            "ip,date,time\n101.81.133.jja,2017-06-30,bogus\n"
        )
        .unwrap();

        let config = Config {
            logfile,
            output: dir.path().join("out.txt"),
            delimiter: ',',
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            key_field: "ip".to_string(),
            inactivity_secs: 2,
        };

        let err = Pipeline::new(config).run().await.unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_logfile_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            logfile: dir.path().join("nope.csv"),
            output: dir.path().join("out.txt"),
            delimiter: ',',
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            key_field: "ip".to_string(),
            inactivity_secs: 2,
        };

        let err = Pipeline::new(config).run().await.unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }
}
