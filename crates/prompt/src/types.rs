//! Prompt types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An instruction template loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub id: String,

    pub title: String,

    /// Schema version, `major.minor`
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    #[serde(default)]
    pub behavior: PromptBehavior,

    #[serde(default)]
    pub context: PromptContextConfig,

    /// Handlebars template for the user message
    pub template: String,

    #[serde(default)]
    pub output: PromptOutputSpec,
}

/// How the model should sound. Rendered into the system message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptBehavior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl PromptBehavior {
    /// System message for these settings, `None` when nothing is set.
    pub fn system_message(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(tone) = self.tone.as_deref().filter(|t| !t.trim().is_empty()) {
            parts.push(format!("Answer in a {} tone.", tone.trim()));
        }
        if let Some(style) = self.style.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("Keep the answer {}.", style.trim()));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Context injection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptContextConfig {
    /// Expose the assembled knowledge context as `knowledgeContext`
    #[serde(rename = "includeKnowledgeBase", default)]
    pub include_knowledge_base: bool,

    /// Label recorded in the built prompt's metadata
    #[serde(rename = "knowledgeBaseName", skip_serializing_if = "Option::is_none")]
    pub knowledge_base_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// "text" or "markdown"
    pub format: String,
}

impl Default for PromptOutputSpec {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

/// A rendered prompt ready to send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    pub system: Option<String>,
    pub user: String,
    pub metadata: BuiltPromptMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    #[serde(rename = "knowledgeBaseUsed", skip_serializing_if = "Option::is_none")]
    pub knowledge_base_used: Option<String>,

    /// Values the template was rendered with
    pub variables: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
behavior:
  tone: friendly
  style: concise
context:
  includeKnowledgeBase: true
template: "{{prompt}}"
output:
  format: markdown
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.behavior.tone.as_deref(), Some("friendly"));
        assert!(def.context.include_knowledge_base);
        assert_eq!(def.context.knowledge_base_name, None);
        assert_eq!(def.output.format, "markdown");
    }

    #[test]
    fn test_optional_sections_default() {
        let yaml = r#"
id: bare
title: Bare
apiVersion: "1.0"
template: "{{prompt}}"
"#;
        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert!(!def.context.include_knowledge_base);
        assert_eq!(def.behavior.system_message(), None);
        assert_eq!(def.output.format, "text");
    }

    #[test]
    fn test_system_message() {
        let behavior = PromptBehavior {
            tone: Some("friendly".to_string()),
            style: Some(" ".to_string()),
        };
        assert_eq!(
            behavior.system_message().as_deref(),
            Some("Answer in a friendly tone.")
        );
    }
}
