//! Prompt builder for rendering templates and injecting context.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use concierge_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// When the definition asks for knowledge context and some is supplied, it
/// is exposed to the template as `knowledgeContext`. The definition's
/// behavior settings become the system message.
///
/// # Example
/// ```no_run
/// use concierge_prompt::{build_prompt, builtin_prompt, ANSWER_PROMPT_ID};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt(ANSWER_PROMPT_ID)?;
/// let mut vars = HashMap::new();
/// vars.insert("prompt".to_string(), "Where is the lounge?".to_string());
///
/// let built = build_prompt(&def, vars, Some("=== CONTEXT ===".to_string()))?;
/// println!("{}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
    knowledge_context: Option<String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let knowledge_base_used = if definition.context.include_knowledge_base {
        match knowledge_context {
            Some(ctx) => {
                variables.insert("knowledgeContext".to_string(), ctx);
                Some(
                    definition
                        .context
                        .knowledge_base_name
                        .clone()
                        .unwrap_or_else(|| "default".to_string()),
                )
            }
            None => {
                tracing::warn!("Knowledge context requested but not provided");
                None
            }
        }
    } else {
        None
    };

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        system: definition.behavior.system_message(),
        user,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            knowledge_base_used,
            variables,
        },
    })
}

/// Render a Handlebars template with variables.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
