//! Config file discovery and loading.
//!
//! Values are layered by the binary: CLI flags, then environment, then the
//! TOML file found here, then built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Locations searched for `filename`, most specific first: `$env_var`, the
/// working directory, the XDG config home and `/etc/climate-api`.
pub fn config_candidates(env_var: &str, filename: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(path) = env::var_os(env_var) {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from(filename));

    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));
    if let Some(dir) = config_home {
        candidates.push(dir.join(APP_NAME).join(filename));
    }

    candidates.push(Path::new("/etc").join(APP_NAME).join(filename));
    candidates
}

/// First candidate that exists, `None` when running on defaults.
pub fn find_config_file(env_var: &str, filename: &str) -> Option<PathBuf> {
    config_candidates(env_var, filename)
        .into_iter()
        .find(|path| path.is_file())
}

/// Parse the TOML file at `path`, or hand back `T::default()` without one.
pub fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> anyhow::Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
