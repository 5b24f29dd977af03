//! Chat message shape accepted by the codec

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::trace::Content;

/// One entry of a chat-style conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Speaker role (e.g. "system", "user", "assistant", "tool")
    pub role: String,

    /// Optional participant name, rendered as `role:name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Message body; strings render raw, other values render structurally.
    /// Required, though an explicit `null` is accepted.
    pub content: Value,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            role: role.into(),
            name: None,
            content: content.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Textual form of the content
    pub fn content_text(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => Content::from(other).render(),
        }
    }
}
