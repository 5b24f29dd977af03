use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;

use agent_trace::codec::{self, Message};
use agent_trace::config::Config;
use agent_trace::logging;
use agent_trace::trace::{AgentLogger, Content, SinkKind, NO_REQUEST, USER};

/// Conversation read from stdin
#[derive(Debug, Deserialize)]
struct Conversation {
    #[serde(default)]
    model: Option<String>,
    messages: Vec<Message>,
}

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Diagnostics go to stderr; stdout carries the stringified conversation
    logging::init_diagnostics(&config.diagnostics_filter);

    let logger = AgentLogger::from_config(&config).context("Failed to open trace sink")?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read conversation from stdin")?;
    let conversation: Conversation =
        serde_json::from_str(&input).context("Failed to parse conversation JSON")?;

    let model = conversation
        .model
        .unwrap_or_else(|| config.default_model.clone());
    let text = codec::stringify_input_messages(&conversation.messages, &model)
        .with_context(|| format!("Failed to stringify conversation for {}", model))?;

    // Only trace to a file; stdout is reserved for the stringified output
    if logger.sink() != SinkKind::Console {
        logger.log(
            USER,
            NO_REQUEST,
            Content::map()
                .field("model", model.as_str())
                .field("messages", conversation.messages.len())
                .field("chars", text.chars().count()),
        );
        logger.flush();
    }

    print!("{}", text);
    Ok(())
}
