//! Load system instructions from a directory of YAML files and apply env overrides.
//!
//! Default text lives in `prompthancer/prompts/*.yaml` and is embedded at compile
//! time. Missing files keep those defaults.

use std::path::{Path, PathBuf};

use super::{FlowPrompts, PromptFile};

macro_rules! embed_prompt_yaml {
    ($name:literal) => {
        include_str!(concat!("../../prompts/", $name))
    };
}
const EMBED_ENHANCE: &str = embed_prompt_yaml!("enhance.yaml");
const EMBED_MODIFY: &str = embed_prompt_yaml!("modify.yaml");

const ENHANCE_FILE: &str = "enhance.yaml";
const MODIFY_FILE: &str = "modify.yaml";

/// Default directory name when `PROMPTS_DIR` is not set.
const DEFAULT_PROMPTS_DIR: &str = "prompts";

const ENHANCE_ENV: &str = "ENHANCE_SYSTEM_PROMPT";
const MODIFY_ENV: &str = "MODIFY_SYSTEM_PROMPT";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

/// `dir` if given, else `PROMPTS_DIR`, else `./prompts`.
fn prompts_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(PathBuf::from).unwrap_or_else(|| {
        std::env::var("PROMPTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROMPTS_DIR))
    })
}

/// Missing file is `Ok(None)`; unreadable or invalid YAML is an error.
fn read_prompt_file(dir: &Path, name: &str) -> Result<Option<PromptFile>, LoadError> {
    let path = dir.join(name);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| LoadError::ParseYaml {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn text_of(file: Option<PromptFile>) -> Option<String> {
    file.and_then(|f| f.system_instruction)
        .filter(|s| !s.trim().is_empty())
}

/// Overrides from `ENHANCE_SYSTEM_PROMPT` / `MODIFY_SYSTEM_PROMPT`, read through `lookup`.
fn apply_env_with(mut prompts: FlowPrompts, lookup: impl Fn(&str) -> Option<String>) -> FlowPrompts {
    if let Some(s) = lookup(ENHANCE_ENV).filter(|s| !s.trim().is_empty()) {
        prompts.enhance = s;
    }
    if let Some(s) = lookup(MODIFY_ENV).filter(|s| !s.trim().is_empty()) {
        prompts.modify = s;
    }
    prompts
}

fn apply_env(prompts: FlowPrompts) -> FlowPrompts {
    apply_env_with(prompts, |k| std::env::var(k).ok())
}

fn embedded() -> FlowPrompts {
    let parse = |yaml: &str| text_of(serde_yaml::from_str::<PromptFile>(yaml).ok()).unwrap_or_default();
    FlowPrompts {
        enhance: parse(EMBED_ENHANCE),
        modify: parse(EMBED_MODIFY),
    }
}

/// Loads `enhance.yaml` and `modify.yaml` from a directory, then applies env overrides.
///
/// If `dir` is `None`, uses `PROMPTS_DIR` or `./prompts`. A missing directory is
/// [`LoadError::DirNotFound`]; a missing file keeps the embedded default.
pub fn load(dir: Option<&Path>) -> Result<FlowPrompts, LoadError> {
    let base = prompts_dir(dir);
    if !base.is_dir() {
        return Err(LoadError::DirNotFound(base.display().to_string()));
    }
    let defaults = embedded();
    let enhance = text_of(read_prompt_file(&base, ENHANCE_FILE)?).unwrap_or(defaults.enhance);
    let modify = text_of(read_prompt_file(&base, MODIFY_FILE)?).unwrap_or(defaults.modify);
    Ok(apply_env(FlowPrompts { enhance, modify }))
}

/// Embedded defaults with env overrides applied.
pub fn default_from_embedded() -> FlowPrompts {
    apply_env(embedded())
}

/// Like [`load`], but a missing directory falls back to [`default_from_embedded`].
///
/// Unreadable or invalid files are still errors.
pub fn load_or_default(dir: Option<&Path>) -> Result<FlowPrompts, LoadError> {
    match load(dir) {
        Err(LoadError::DirNotFound(_)) => Ok(default_from_embedded()),
        other => other,
    }
}
