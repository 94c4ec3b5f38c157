//! System instructions for the two flows.
//!
//! Defaults are the YAML files under `prompthancer/prompts/`, embedded at compile
//! time. A prompts directory (`PROMPTS_DIR`) and env vars can override them; see
//! [`load`] and [`load_or_default`].

mod load;

pub use load::{default_from_embedded, load, load_or_default, LoadError};

use serde::Deserialize;

/// One prompt file: `system_instruction: "..."`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PromptFile {
    #[serde(default)]
    pub system_instruction: Option<String>,
}

/// Resolved system instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowPrompts {
    pub enhance: String,
    pub modify: String,
}

impl Default for FlowPrompts {
    fn default() -> Self {
        default_from_embedded()
    }
}

impl FlowPrompts {
    pub fn new(enhance: impl Into<String>, modify: impl Into<String>) -> Self {
        Self {
            enhance: enhance.into(),
            modify: modify.into(),
        }
    }
}
