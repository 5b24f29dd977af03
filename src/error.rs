//! Error types for agent-trace

use std::path::{Path, PathBuf};

use crate::config::friendly_io_error_message;

/// Errors surfaced by the trace logger and the message codec
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The model identifier matched none of the known profiles
    #[error("model not supported: {model}")]
    UnsupportedModel { model: String },

    /// The log file could not be opened for appending.
    /// The previously active sink is still in place.
    #[error("{}", sink_open_message(.path, .source))]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

fn sink_open_message(path: &Path, source: &std::io::Error) -> String {
    friendly_io_error_message(
        source,
        &format!("Failed to open log file {}", path.display()),
    )
}

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, TraceError>;
