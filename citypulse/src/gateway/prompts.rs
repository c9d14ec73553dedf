//! System instructions per query mode.
//!
//! **Canonical source**: `citypulse/prompts/gateway.yaml`, embedded at compile time and parsed
//! when a client is constructed.

use serde::Deserialize;

use crate::error::ConfigError;

const EMBEDDED: &str = include_str!("../../prompts/gateway.yaml");

/// Parsed system instructions. Every field is required so a broken edit of the YAML fails at
/// construction instead of sending an empty instruction.
#[derive(Clone, Debug, Deserialize)]
pub struct SystemPrompts {
    pub plain_assistant: String,
    pub current_events: String,
    pub local_guide: String,
    pub precise: String,
    pub discovery: String,
    pub discovery_with_citations: String,
    pub insights: String,
}

impl SystemPrompts {
    /// Parses the embedded YAML.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(EMBEDDED)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let prompts: Self =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Prompts(e.to_string()))?;
        Ok(prompts)
    }
}

/// User message for the insights mode.
pub(crate) fn insights_user_prompt(name: &str, kind: &str, description: &str, address: &str) -> String {
    format!(
        "Please provide personalized recommendations for:\n\n\
         **Location**: {name}\n\
         **Type**: {kind}\n\
         **Description**: {description}\n\
         **Address**: {address}\n\n\
         Give me specific, actionable advice for making the most of a visit to this place."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_prompts_parse() {
        let p = SystemPrompts::embedded().unwrap();
        assert_eq!(p.precise.trim(), "Be precise and concise.");
        assert!(p.discovery_with_citations.contains("event_001"));
        assert!(p.discovery_with_citations.contains("at least 5 items"));
        assert!(p.discovery_with_citations.contains("ONLY when the source differs"));
        assert!(p.insights.contains("Budget Considerations"));
    }

    #[test]
    fn missing_field_is_config_error() {
        let err = SystemPrompts::from_yaml("precise: short\n").unwrap_err();
        assert!(matches!(err, ConfigError::Prompts(_)));
    }

    #[test]
    fn insights_prompt_lists_fields() {
        let p = insights_user_prompt("Blue Bottle", "cafe", "Specialty coffee", "1 Main St");
        assert!(p.contains("**Location**: Blue Bottle"));
        assert!(p.contains("**Type**: cafe"));
        assert!(p.contains("**Address**: 1 Main St"));
    }
}
