//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hashgen - Regenerate SHA256 hashes in resource download manifests
#[derive(Parser, Debug)]
#[command(name = "hashgen")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (defaults to ./hashgen.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bytes read per step when hashing a file
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub block_size: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Manifest format to refresh
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh the legacy section-based manifest (download.cfg)
    Cfg {
        #[command(flatten)]
        target: Target,
    },

    /// Refresh the JSON manifest (download_3.0.conf)
    Json {
        #[command(flatten)]
        target: Target,
    },
}

/// Options shared by both manifest commands
#[derive(clap::Args, Debug)]
pub struct Target {
    /// Manifest path (defaults to the settings file or the built-in location)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Only report entries whose stored hash is out of date
    #[arg(long)]
    pub check: bool,
}
