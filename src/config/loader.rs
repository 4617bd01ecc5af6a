// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

pub const CONFIG_ENV_VAR: &str = "SCRIPTCOLLECT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "scriptcollect.toml";

/// Parse a TOML file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading config");
    let contents = fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<RawConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Read, apply `serde` defaults, then validate cluster identity, exporter
/// settings, adapter names and collection intervals.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}

/// Config path when `--config` is not given: `$SCRIPTCOLLECT_CONFIG` if set
/// and non-empty, else `scriptcollect.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    resolve_config_path(None, std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
}

/// Precedence: explicit flag, then environment, then [`DEFAULT_CONFIG_FILE`].
pub fn resolve_config_path(flag: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    flag.or(env.filter(|p| !p.as_os_str().is_empty()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
