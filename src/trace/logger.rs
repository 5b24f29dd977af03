//! The shared trace logger handle
//!
//! One `AgentLogger` is created at startup and shared (usually through an
//! `Arc`) with every task that records activity.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;

use super::content::Content;
use super::ids::IdAllocator;
use super::record::LogRecord;
use super::sink::{SinkKind, SinkManager};

/// Action label for a model request
pub const LLM_CALL: &str = "LLM Call";
/// Action label for a completed model response
pub const LLM_RETURN: &str = "LLM Return";
/// Action label for streamed model output
pub const LLM_DECODING: &str = "LLM Decoding";
/// Action label for a tool invocation
pub const TOOL_CALL: &str = "Tool Call";
/// Action label for a tool result
pub const TOOL_RETURN: &str = "Tool Return";
/// Action label for driver-level notes such as task boundaries
pub const USER: &str = "USER";

/// Request id for records that belong to no request
pub const NO_REQUEST: i64 = -1;

/// Allocates identifiers and writes trace records to the active sink
#[derive(Debug)]
pub struct AgentLogger {
    ids: IdAllocator,
    sinks: SinkManager,
}

impl AgentLogger {
    /// Create a logger writing to stdout, with request ids seeded from the wall clock
    pub fn new() -> Self {
        Self::from_parts(IdAllocator::new())
    }

    /// Create a logger writing to stdout whose first request id is `seed`
    pub fn with_seed(seed: i64) -> Self {
        Self::from_parts(IdAllocator::with_seed(seed))
    }

    fn from_parts(ids: IdAllocator) -> Self {
        tracing::debug!("Trace logger started with request seed {}", ids.seed());
        Self {
            ids,
            sinks: SinkManager::new(),
        }
    }

    /// Create a logger from configuration, redirecting to the configured file if any
    pub fn from_config(config: &Config) -> Result<Self> {
        let logger = match config.request_seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        };
        if let Some(path) = config.expanded_log_file() {
            logger.set_log_file(path)?;
        }
        Ok(logger)
    }

    pub fn allocate_call_id(&self, call_type: &str) -> u64 {
        self.ids.allocate_call_id(call_type)
    }

    pub fn allocate_request_id(&self) -> i64 {
        self.ids.allocate_request_id()
    }

    pub fn current_request_id(&self) -> i64 {
        self.ids.current_request_id()
    }

    pub fn seed(&self) -> i64 {
        self.ids.seed()
    }

    /// Redirect all further records to `path` (append mode).
    /// On failure the current sink keeps receiving records.
    pub fn set_log_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.sinks.set_log_file(path)
    }

    pub fn reset_to_console(&self) {
        self.sinks.reset_to_console();
    }

    pub fn sink(&self) -> SinkKind {
        self.sinks.kind()
    }

    /// Append one record to the active sink
    pub fn log(&self, action: &str, request_id: i64, content: impl Into<Content>) {
        self.log_record(&LogRecord::new(action, request_id, content));
    }

    /// Append an already built record to the active sink
    pub fn log_record(&self, record: &LogRecord) {
        if let Err(e) = self.sinks.write_line(&record.format_line()) {
            tracing::warn!(
                "Failed to write trace record (request {}, action {}): {}",
                record.request_id(),
                record.action(),
                e
            );
        }
    }

    /// Flush the active sink
    pub fn flush(&self) {
        if let Err(e) = self.sinks.flush() {
            tracing::warn!("Failed to flush trace sink: {}", e);
        }
    }
}

impl Default for AgentLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AgentLogger {
    fn drop(&mut self) {
        self.flush();
    }
}
