//! Structured activity tracing
//!
//! Identifier allocation, record formatting and the switchable output sink
//! used to trace concurrently running agent tasks.

mod content;
mod ids;
mod logger;
mod record;
mod sink;

pub use content::{Content, MapBuilder};
pub use ids::{wall_clock_seed, IdAllocator};
pub use logger::{
    AgentLogger, LLM_CALL, LLM_DECODING, LLM_RETURN, NO_REQUEST, TOOL_CALL, TOOL_RETURN, USER,
};
pub use record::{format_timestamp, LogRecord, ParsedRecord};
pub use sink::{SinkKind, SinkManager};
