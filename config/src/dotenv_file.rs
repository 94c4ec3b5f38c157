//! Read a project `.env` file into a key-value map without touching the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `override_dir/.env` if given, else `./.env`; `None` when no such file exists.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses the `.env` file; a missing file yields an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    let iter = ::dotenv::from_path_iter(&path).map_err(LoadError::Dotenv)?;
    iter.collect::<Result<HashMap<_, _>, _>>()
        .map_err(LoadError::Dotenv)
}
