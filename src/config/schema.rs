//! Settings schema
//!
//! Defines the structure of the optional `hashgen.toml` settings file.

use crate::manifest::{cfg, json};
use crate::util::hash::DEFAULT_BLOCK_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Hashing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Bytes read per step when streaming a file
    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
        }
    }
}

/// Manifest locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Legacy section-based manifest
    #[serde(default = "default_cfg_manifest")]
    pub cfg_manifest: PathBuf,

    /// JSON manifest
    #[serde(default = "default_json_manifest")]
    pub json_manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cfg_manifest: default_cfg_manifest(),
            json_manifest: default_json_manifest(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Comment line written at the top of the legacy manifest
    #[serde(default = "default_cfg_header")]
    pub cfg_header: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cfg_header: default_cfg_header(),
        }
    }
}

// Default value functions for serde
fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}
fn default_cfg_manifest() -> PathBuf {
    PathBuf::from(cfg::DEFAULT_MANIFEST)
}
fn default_json_manifest() -> PathBuf {
    PathBuf::from(json::DEFAULT_MANIFEST)
}
fn default_cfg_header() -> String {
    cfg::DEFAULT_HEADER.to_string()
}
