//! Utility module
//!
//! Hashing and file helpers shared by both manifest pipelines.

pub mod fs;
pub mod hash;
