//! Internal diagnostics for agent-trace
//!
//! Diagnostics (sink switches, write failures, model shorthand warnings) go
//! through `tracing` to stderr. They never reach the trace sink, so trace
//! files only ever contain records.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the diagnostics filter. `RUST_LOG` wins over the configured filter.
pub fn diagnostics_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("agent_trace=info"))
}

/// Install the stderr diagnostics subscriber
///
/// Returns false if a global subscriber was already installed.
pub fn init_diagnostics(configured_filter: &str) -> bool {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(diagnostics_filter(configured_filter))
        .with(stderr_layer)
        .try_init()
        .is_ok()
}
