//! Model identifier resolution
//!
//! Resolution tries three tiers in order: an exact dated identifier, a family
//! shorthand forwarded to a dated identifier, and the self-hosted open LLM
//! family. Anything else is an error.

use std::fmt;

use crate::error::{Result, TraceError};

/// Delimiters used to render a conversation for one model family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelProfile {
    pub role_prefix: &'static str,
    pub separator: &'static str,
    pub content_suffix: &'static str,
}

/// Chat-completion models using `<|im_sep|>` between role and content
const MODERN_MODELS: &[&str] = &[
    "gpt-3.5-turbo-0613",
    "gpt-3.5-turbo-16k-0613",
    "gpt-35-turbo",
    "gpt-35-turbo-16k",
    "gpt-3.5-turbo-16k",
    "gpt-3.5-turbo-1106",
    "gpt-3.5-turbo-0125",
    "gpt-4-0314",
    "gpt-4-32k-0314",
    "gpt-4-0613",
    "gpt-4-32k-0613",
    "gpt-4-turbo",
    "gpt-4-turbo-preview",
    "gpt-4-0125-preview",
    "gpt-4-vision-preview",
    "gpt-4-1106-vision-preview",
    "gpt-4-1106-preview",
    "gpt-4o-2024-05-13",
    "gpt-4o",
];

const LEGACY_0301_MODEL: &str = "gpt-3.5-turbo-0301";

/// Identifier covering every model served by a self-hosted open LLM endpoint
pub const OPEN_LLM_MODEL: &str = "open-llm-model";

/// Family shorthands and the dated identifier each one currently means
const SHORTHANDS: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "gpt-3.5-turbo-0125"),
    ("gpt-4", "gpt-4-0613"),
];

/// Rendering family of a model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Modern,
    Legacy0301,
    OpenLlm,
}

impl ModelFamily {
    /// Exact match against known dated chat-completion identifiers
    pub fn exact_match(model: &str) -> Option<Self> {
        if MODERN_MODELS.contains(&model) {
            Some(ModelFamily::Modern)
        } else if model == LEGACY_0301_MODEL {
            Some(ModelFamily::Legacy0301)
        } else {
            None
        }
    }

    /// Match the self-hosted open LLM identifier
    pub fn self_hosted(model: &str) -> Option<Self> {
        (model == OPEN_LLM_MODEL).then_some(ModelFamily::OpenLlm)
    }

    pub fn profile(self) -> ModelProfile {
        match self {
            ModelFamily::Modern => ModelProfile {
                role_prefix: "<|im_start|>",
                separator: "<|im_sep|>",
                content_suffix: "<|im_end|>",
            },
            ModelFamily::Legacy0301 => ModelProfile {
                role_prefix: "<|im_start|>",
                separator: "\n",
                content_suffix: "<|im_end|>\n",
            },
            ModelFamily::OpenLlm => ModelProfile {
                role_prefix: "",
                separator: ":",
                content_suffix: "\n",
            },
        }
    }
}

/// Dated identifier a family shorthand forwards to
pub fn family_shorthand(model: &str) -> Option<&'static str> {
    SHORTHANDS
        .iter()
        .find(|(shorthand, _)| *shorthand == model)
        .map(|(_, dated)| *dated)
}

/// Raised when a family shorthand was resolved to a dated identifier.
/// The shorthand may point at a different model in the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandWarning {
    pub requested: String,
    pub resolved: &'static str,
}

impl fmt::Display for ShorthandWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} may update over time; assuming {}",
            self.requested, self.resolved
        )
    }
}

/// Outcome of resolving a model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub family: ModelFamily,
    /// The identifier the profile was chosen for (the dated one for shorthands)
    pub resolved_model: String,
    pub profile: ModelProfile,
    pub warning: Option<ShorthandWarning>,
}

/// Resolve a model identifier to its rendering profile.
///
/// Pure: a shorthand warning is returned, never emitted.
pub fn resolve(model: &str) -> Result<Resolution> {
    if let Some(family) = ModelFamily::exact_match(model) {
        return Ok(Resolution {
            family,
            resolved_model: model.to_string(),
            profile: family.profile(),
            warning: None,
        });
    }

    if let Some(dated) = family_shorthand(model) {
        let mut resolution = resolve(dated)?;
        resolution.warning = Some(ShorthandWarning {
            requested: model.to_string(),
            resolved: dated,
        });
        return Ok(resolution);
    }

    if let Some(family) = ModelFamily::self_hosted(model) {
        return Ok(Resolution {
            family,
            resolved_model: model.to_string(),
            profile: family.profile(),
            warning: None,
        });
    }

    Err(TraceError::UnsupportedModel {
        model: model.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_tables() {
        assert_eq!(ModelFamily::exact_match("gpt-4o"), Some(ModelFamily::Modern));
        assert_eq!(
            ModelFamily::exact_match("gpt-35-turbo-16k"),
            Some(ModelFamily::Modern)
        );
        assert_eq!(
            ModelFamily::exact_match("gpt-3.5-turbo-0301"),
            Some(ModelFamily::Legacy0301)
        );
        assert_eq!(ModelFamily::exact_match("gpt-4"), None);
        assert_eq!(ModelFamily::exact_match("open-llm-model"), None);
    }

    #[test]
    fn test_family_shorthand_targets() {
        assert_eq!(family_shorthand("gpt-3.5-turbo"), Some("gpt-3.5-turbo-0125"));
        assert_eq!(family_shorthand("gpt-4"), Some("gpt-4-0613"));
        assert_eq!(family_shorthand("gpt-4o"), None);
        assert_eq!(family_shorthand("GPT-4"), None);
    }

    #[test]
    fn test_shorthand_targets_are_known_models() {
        for (_, dated) in SHORTHANDS {
            assert!(ModelFamily::exact_match(dated).is_some(), "{}", dated);
        }
    }

    #[test]
    fn test_resolve_exact_has_no_warning() {
        let resolution = resolve("gpt-4-turbo").unwrap();
        assert_eq!(resolution.family, ModelFamily::Modern);
        assert_eq!(resolution.resolved_model, "gpt-4-turbo");
        assert_eq!(resolution.warning, None);
    }

    #[test]
    fn test_resolve_shorthand_forwards_with_warning() {
        let resolution = resolve("gpt-4").unwrap();
        assert_eq!(resolution.family, ModelFamily::Modern);
        assert_eq!(resolution.resolved_model, "gpt-4-0613");
        let warning = resolution.warning.unwrap();
        assert_eq!(warning.requested, "gpt-4");
        assert_eq!(
            warning.to_string(),
            "gpt-4 may update over time; assuming gpt-4-0613"
        );
    }

    #[test]
    fn test_resolve_legacy_profile() {
        let profile = resolve("gpt-3.5-turbo-0301").unwrap().profile;
        assert_eq!(profile.separator, "\n");
        assert_eq!(profile.content_suffix, "<|im_end|>\n");
    }

    #[test]
    fn test_resolve_open_llm() {
        let resolution = resolve("open-llm-model").unwrap();
        assert_eq!(resolution.family, ModelFamily::OpenLlm);
        assert_eq!(resolution.profile.role_prefix, "");
        assert_eq!(resolution.profile.separator, ":");
    }

    #[test]
    fn test_resolve_unknown_fails() {
        match resolve("not-a-real-model") {
            Err(TraceError::UnsupportedModel { model }) => assert_eq!(model, "not-a-real-model"),
            other => panic!("expected unsupported model error, got {:?}", other),
        }
    }
}
