//! Conversation stringification
//!
//! Serializes a chat history into the delimited text a given model family
//! sees, for length and cost accounting. The codec is stateless.

mod message;
mod profile;

pub use message::Message;
pub use profile::{
    family_shorthand, resolve, ModelFamily, ModelProfile, Resolution, ShorthandWarning,
    OPEN_LLM_MODEL,
};

use crate::error::Result;

/// Model assumed when a caller does not name one
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";

/// Render messages with a resolved profile, followed by the assistant reply marker
pub fn render(messages: &[Message], profile: &ModelProfile) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(profile.role_prefix);
        out.push_str(&message.role);
        if let Some(name) = &message.name {
            out.push(':');
            out.push_str(name);
        }
        out.push_str(profile.separator);
        out.push_str(&message.content_text());
        out.push_str(profile.content_suffix);
    }
    out.push_str(profile.role_prefix);
    out.push_str("assistant");
    out.push_str(profile.separator);
    out
}

/// Resolve `model` and render `messages`, returning any shorthand warning
/// instead of emitting it
pub fn stringify_with_resolution(
    messages: &[Message],
    model: &str,
) -> Result<(String, Resolution)> {
    let resolution = resolve(model)?;
    Ok((render(messages, &resolution.profile), resolution))
}

/// Serialize a conversation for `model`.
///
/// Fails with [`crate::TraceError::UnsupportedModel`] for unknown identifiers.
/// Family shorthands resolve with a warning diagnostic.
pub fn stringify_input_messages(messages: &[Message], model: &str) -> Result<String> {
    let (text, resolution) = stringify_with_resolution(messages, model)?;
    if let Some(warning) = &resolution.warning {
        tracing::warn!("{}", warning);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraceError;
    use serde_json::json;

    #[test]
    fn test_modern_profile_rendering() {
        let messages = vec![Message::new("system", "x"), Message::new("user", "y")];
        assert_eq!(
            stringify_input_messages(&messages, "gpt-4o").unwrap(),
            "<|im_start|>system<|im_sep|>x<|im_end|><|im_start|>user<|im_sep|>y<|im_end|><|im_start|>assistant<|im_sep|>"
        );
    }

    #[test]
    fn test_open_llm_rendering() {
        let messages = vec![Message::new("user", "hi")];
        assert_eq!(
            stringify_input_messages(&messages, "open-llm-model").unwrap(),
            "user:hi\nassistant:"
        );
    }

    #[test]
    fn test_legacy_rendering() {
        let messages = vec![Message::new("user", "hi")];
        assert_eq!(
            stringify_input_messages(&messages, "gpt-3.5-turbo-0301").unwrap(),
            "<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n"
        );
    }

    #[test]
    fn test_unknown_model_fails() {
        let messages = vec![Message::new("user", "hi")];
        let err = stringify_input_messages(&messages, "not-a-real-model").unwrap_err();
        assert!(matches!(err, TraceError::UnsupportedModel { ref model } if model == "not-a-real-model"));
        assert!(err.to_string().contains("not-a-real-model"));
    }

    #[test]
    fn test_shorthand_matches_dated_model() {
        let messages = vec![Message::new("user", "hi").with_name("bob")];
        let (text, resolution) = stringify_with_resolution(&messages, "gpt-3.5-turbo").unwrap();
        assert_eq!(
            text,
            stringify_input_messages(&messages, "gpt-3.5-turbo-0125").unwrap()
        );
        assert!(resolution.warning.is_some());
    }

    #[test]
    fn test_name_is_appended_to_role() {
        let messages = vec![Message::new("tool", "42").with_name("calculator")];
        assert_eq!(
            stringify_input_messages(&messages, "open-llm-model").unwrap(),
            "tool:calculator:42\nassistant:"
        );
    }

    #[test]
    fn test_empty_conversation_has_only_reply_marker() {
        assert_eq!(
            stringify_input_messages(&[], DEFAULT_MODEL).unwrap(),
            "<|im_start|>assistant<|im_sep|>"
        );
    }

    #[test]
    fn test_non_string_content() {
        let messages = vec![Message::new("user", json!({"n": 1}))];
        assert_eq!(
            stringify_input_messages(&messages, "open-llm-model").unwrap(),
            "user:{\"n\": 1}\nassistant:"
        );
    }

    #[test]
    fn test_parallel_calls_are_independent() {
        std::thread::scope(|s| {
            for i in 0..8 {
                s.spawn(move || {
                    let messages = vec![Message::new("user", format!("task {}", i))];
                    let text = stringify_input_messages(&messages, "open-llm-model").unwrap();
                    assert_eq!(text, format!("user:task {}\nassistant:", i));
                });
            }
        });
    }
}
