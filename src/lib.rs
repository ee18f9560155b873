//! hashgen library root
//!
//! Streaming SHA256 hashing and the two manifest refresh pipelines.

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod util;

pub use config::Settings;
pub use error::{HashgenError, Result};
pub use manifest::{EntryOutcome, RefreshOptions, RefreshReport};
