//! Load configuration from XDG `config.toml` and project `.env`, then apply it to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! Also resolves provider credentials ([`api_key`]) so binaries can decide whether a
//! model can be called before building one.

mod dotenv_file;
mod xdg_toml;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(::dotenv::Error),
}

/// Pairs to set, given what is already in the environment: `.env` beats XDG, and keys
/// already present are skipped.
fn merge(
    is_set: impl Fn(&str) -> bool,
    dotenv: &HashMap<String, String>,
    xdg: &HashMap<String, String>,
) -> Vec<(String, String)> {
    let keys: HashSet<&String> = dotenv.keys().chain(xdg.keys()).collect();
    let mut out: Vec<(String, String)> = keys
        .into_iter()
        .filter(|k| !is_set(k))
        .filter_map(|k| {
            dotenv
                .get(k)
                .or_else(|| xdg.get(k))
                .map(|v| (k.clone(), v.clone()))
        })
        .collect();
    out.sort();
    out
}

/// Loads XDG `config.toml` `[env]` and the project `.env`, then sets environment variables
/// only for keys that are **not** already set.
///
/// * `app_name`: e.g. `"prompthancer"`, used for `~/.config/<app_name>/config.toml`.
/// * `override_dir`: look for `.env` here instead of the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv_file::load_env_map(override_dir)?;
    let pairs = merge(|k| std::env::var_os(k).is_some(), &dotenv_map, &xdg_map);
    debug!(
        dotenv_keys = dotenv_map.len(),
        xdg_keys = xdg_map.len(),
        applied = pairs.len(),
        "configuration loaded"
    );
    for (key, value) in pairs {
        std::env::set_var(key, value);
    }
    Ok(())
}

/// Non-blank value of the credential variable `var` (e.g. `GEMINI_API_KEY`).
pub fn api_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
