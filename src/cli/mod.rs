//! CLI module
//!
//! Command-line interface for hashgen.

mod args;

pub use args::{Args, Commands, Target};

use crate::config;
use crate::error::HashgenError;
use crate::manifest::{RefreshOptions, RefreshReport, cfg, json};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Run the command selected on the command line
pub fn run(args: Args) -> Result<()> {
    let settings = config::load(args.config.as_deref()).context("Failed to load settings")?;
    let block_size = args
        .block_size
        .map(|size| size as usize)
        .unwrap_or(settings.hashing.block_size);

    match args.command {
        Commands::Cfg { target } => {
            let path = manifest_path(&target, &settings.paths.cfg_manifest);
            let options = refresh_options(&target, block_size);
            let result = cfg::refresh(
                &path,
                &settings.output.cfg_header,
                &options,
                print_progress,
            );
            finish(result, &path)
        }
        Commands::Json { target } => {
            let path = manifest_path(&target, &settings.paths.json_manifest);
            let options = refresh_options(&target, block_size);
            let result = json::refresh(&path, &options, print_progress);
            finish(result, &path)
        }
    }
}

fn print_progress(path: &Path) {
    println!("Calculating hash for {}", path.display());
}

fn manifest_path(target: &Target, default: &Path) -> PathBuf {
    target
        .manifest
        .clone()
        .unwrap_or_else(|| default.to_path_buf())
}

fn refresh_options(target: &Target, block_size: usize) -> RefreshOptions {
    RefreshOptions {
        block_size,
        check: target.check,
    }
}

/// Report a pipeline result to the user
fn finish(result: crate::error::Result<RefreshReport>, path: &Path) -> Result<()> {
    let report = match result {
        Ok(report) => report,
        Err(HashgenError::ManifestNotFound { path }) => {
            println!(
                "❌ Can't find {}. You need to run hashgen from the scripts directory.",
                path.display()
            );
            anyhow::bail!("Manifest not found: {}", path.display());
        }
        Err(e) => {
            return Err(e).context(format!("Failed to refresh {}", path.display()));
        }
    };

    print_report(&report);

    if !report.written {
        let stale = report.stale().count();
        if stale > 0 {
            anyhow::bail!(
                "{} of {} entries in {} are out of date",
                stale,
                report.entries.len(),
                report.manifest.display()
            );
        }
    }

    Ok(())
}

fn print_report(report: &RefreshReport) {
    let stale: Vec<_> = report.stale().collect();

    if report.written {
        for entry in &stale {
            println!("   {} {} -> {}", entry.category, entry.name, entry.sha256);
        }
        println!(
            "✅ {} hashes written to {} ({} changed)",
            report.entries.len(),
            report.manifest.display(),
            stale.len()
        );
        return;
    }

    if stale.is_empty() {
        println!(
            "✅ All {} hashes in {} are up to date",
            report.entries.len(),
            report.manifest.display()
        );
        return;
    }

    for entry in &stale {
        tracing::warn!("Stale hash for {} {}", entry.category, entry.name);
        println!(
            "❌ {} {}: stored {}, actual {}",
            entry.category,
            entry.name,
            entry.previous.as_deref().unwrap_or("<none>"),
            entry.sha256
        );
    }
}
