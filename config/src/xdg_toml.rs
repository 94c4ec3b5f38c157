//! Load the `[env]` table from `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set and absolute, else the platform config dir.
pub(crate) fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return Ok(dir);
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory for this user".into()))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
}

/// `[env]` pairs from one TOML file; a missing file yields an empty map.
pub(crate) fn read_env_table(path: &Path) -> Result<HashMap<String, String>, LoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(LoadError::XdgRead(e)),
    };
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.env)
}

/// `[env]` pairs from the app's XDG config file.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    read_env_table(&path)
}
