//! Error types
//!
//! Failures that abort a refresh run. Every variant is raised before the
//! manifest is rewritten, so the file on disk is left as it was.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashgenError {
    #[error("manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("I/O error: {source} (path: {})", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid JSON manifest {}: {source}", path.display())]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("missing section [{section}]")]
    MissingSection { section: String },

    #[error("missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    #[error("empty entry in '{key}' list of section [{section}]")]
    EmptySubkey { section: String, key: String },

    #[error("invalid settings file {}: {source}", path.display())]
    Config {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("block size must be greater than zero")]
    InvalidBlockSize,
}

pub type Result<T> = std::result::Result<T, HashgenError>;

impl HashgenError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HashgenError::Io {
            source,
            path: path.into(),
        }
    }
}
