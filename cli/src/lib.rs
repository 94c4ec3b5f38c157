//! Library half of the `prompthancer` binary: service wiring and output for the one-shot
//! `enhance` / `modify` commands.

pub mod display;

use std::path::Path;
use std::sync::Arc;

use prompthancer::{
    load_prompts_or_default, ClientKey, EnhanceInput, EnhancementResult, FixedWindowLimiter,
    FlowConfig, ModificationResult, ModifyInput, PromptService, PromptsLoadError,
};

pub use display::{format_enhancement, format_modification, truncate_display};

/// Rate-limit key for commands run from the terminal.
pub const LOCAL_CLIENT: &str = "local-cli";

/// Service from environment configuration (after `config::load_and_apply`).
pub fn service_from_env() -> Result<PromptService, PromptsLoadError> {
    let flow_config = FlowConfig::from_env();
    let prompts = load_prompts_or_default(None)?;
    let api_key = config::api_key(flow_config.provider.api_key_var());
    let limiter = Arc::new(FixedWindowLimiter::new(flow_config.rate_limit));
    Ok(PromptService::from_config(
        &flow_config,
        prompts,
        api_key,
        limiter,
    ))
}

/// Record produced by a one-shot command.
#[derive(Debug, Clone)]
pub enum Output {
    Enhancement(EnhancementResult),
    Modification(ModificationResult),
}

impl Output {
    pub fn is_error(&self) -> bool {
        match self {
            Output::Enhancement(r) => r.is_error(),
            Output::Modification(r) => r.is_error(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Output::Enhancement(r) => serde_json::to_value(r),
            Output::Modification(r) => serde_json::to_value(r),
        }
    }

    /// Text for stdout; `max` bounds echoed input (0 = no limit).
    pub fn render(&self, max: usize) -> String {
        match self {
            Output::Enhancement(r) => format_enhancement(r, max),
            Output::Modification(r) => format_modification(r),
        }
    }
}

pub async fn run_enhance(service: &PromptService, prompt: String) -> Output {
    let client = ClientKey::new(LOCAL_CLIENT);
    Output::Enhancement(service.enhance(&client, EnhanceInput::new(prompt)).await)
}

pub async fn run_modify(service: &PromptService, input: ModifyInput) -> Output {
    let client = ClientKey::new(LOCAL_CLIENT);
    Output::Modification(service.modify(&client, input).await)
}

/// Writes JSON to stdout or to the given file. When pretty is true, multi-line; else one line.
pub fn write_json_output(
    value: &serde_json::Value,
    file: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", s))?,
        None => {
            println!("{}", s);
            std::io::Write::flush(&mut std::io::stdout())?;
        }
    }
    Ok(())
}
