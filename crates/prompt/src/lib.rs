//! Prompt system for the concierge.
//!
//! Instruction templates are YAML prompt definitions rendered with
//! Handlebars. A workspace may override any built-in definition by placing a
//! file with the same id under `.concierge/prompts/`.

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, render_template};
pub use loader::{builtin_prompt, list_prompts, load_prompt, resolve_prompt, ANSWER_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptContextConfig, PromptDefinition,
    PromptOutputSpec,
};
