pub mod configuration;
pub mod error_handling;
pub mod log_input;
pub mod output;
pub mod pipeline;
pub mod session_engine;

pub use configuration::config::Config;
pub use pipeline::{Pipeline, PipelineSummary};
pub use session_engine::dispatcher::Dispatcher;
pub use session_engine::types::{Entry, Record};
