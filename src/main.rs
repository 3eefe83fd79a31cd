use log::{error, info};
use sessionize::configuration::config::Config;
use sessionize::pipeline::Pipeline;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    info!("Importing configuration");

    let config = match Config::from_args() {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to resolve configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Sessionizing {} with a {}s inactivity period",
        config.logfile.display(),
        config.inactivity_secs
    );

    let pipeline = Pipeline::new(config);
    match pipeline.run().await {
        Ok(summary) => {
            info!(
                "Done: {} records, {} keys, {} session entries",
                summary.records_read, summary.distinct_keys, summary.entries_written
            );
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}
