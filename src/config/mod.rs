//! Configuration module
//!
//! Loads optional settings. Nothing is ever written back; a missing default
//! settings file simply means built-in defaults.

mod schema;

pub use schema::{HashingConfig, OutputConfig, PathsConfig, Settings};

use crate::error::{HashgenError, Result};
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory
pub const SETTINGS_FILE: &str = "hashgen.toml";

/// Get the default settings file path
pub fn settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE)
}

/// Load settings from `path`, or from the default location if it exists.
///
/// An explicitly given path must exist.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let path = settings_path();
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|e| HashgenError::io(&path, e))?;
    let settings = parse(&content, &path)?;

    tracing::debug!("Settings loaded from {:?}", path);
    Ok(settings)
}

/// Parse settings text; `path` is only used in error messages.
pub fn parse(content: &str, path: &Path) -> Result<Settings> {
    toml::from_str(content).map_err(|source| HashgenError::Config {
        source,
        path: path.to_path_buf(),
    })
}
