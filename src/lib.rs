//! agent-trace - structured activity logging for concurrently running agent tasks
//!
//! Allocates request and call identifiers, writes one-line trace records to a
//! switchable sink, and stringifies chat conversations per model family.

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod trace;

pub use codec::{stringify_input_messages, Message};
pub use error::{Result, TraceError};
pub use trace::{AgentLogger, Content, LogRecord};
