//! JSON manifest pipeline
//!
//! Walks `songs`, `bibles.<language>.translations` and `themes`, hashing each
//! file relative to the matching `_meta` directory.

mod schema;

pub use schema::*;

use super::{Category, EntryOutcome, RefreshOptions, RefreshReport, manifest_dir, refresh_entry};
use crate::error::{HashgenError, Result};
use crate::util::fs::atomic_write;
use std::path::Path;

/// Default manifest location, relative to the scripts directory
pub const DEFAULT_MANIFEST: &str = "../download_3.0.conf";

/// Load and validate a manifest.
pub fn load(path: &Path) -> Result<Manifest> {
    if !path.exists() {
        return Err(HashgenError::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| HashgenError::io(path, e))?;
    let manifest: Manifest =
        serde_json::from_str(&content).map_err(|source| HashgenError::Json {
            source,
            path: path.to_path_buf(),
        })?;

    tracing::debug!("Loaded {:?} with {} entries", path, manifest.entry_count());
    Ok(manifest)
}

/// Hash every song, bible translation and theme, resolving the `_meta`
/// directories against `base_dir`.
pub fn refresh_entries<P: FnMut(&Path)>(
    manifest: &mut Manifest,
    base_dir: &Path,
    block_size: usize,
    mut progress: P,
) -> Result<Vec<EntryOutcome>> {
    let mut outcomes = Vec::with_capacity(manifest.entry_count());

    let song_folder = base_dir.join(&manifest.meta.songs_dir);
    for (name, song) in manifest.songs.iter_mut() {
        outcomes.push(refresh_entry(
            song,
            Category::Songs,
            name,
            &song_folder,
            block_size,
            &mut progress,
        )?);
    }

    let bible_folder = base_dir.join(&manifest.meta.bibles_dir);
    for (language, bibles) in manifest.bibles.iter_mut() {
        for (translation, bible) in bibles.translations.iter_mut() {
            let name = format!("{}/{}", language, translation);
            outcomes.push(refresh_entry(
                bible,
                Category::Bibles,
                &name,
                &bible_folder,
                block_size,
                &mut progress,
            )?);
        }
    }

    let theme_folder = base_dir.join(&manifest.meta.themes_dir);
    for (name, theme) in manifest.themes.iter_mut() {
        outcomes.push(refresh_entry(
            theme,
            Category::Themes,
            name,
            &theme_folder,
            block_size,
            &mut progress,
        )?);
    }

    Ok(outcomes)
}

/// Serialize with sorted keys and two-space indentation.
pub fn to_json_string(manifest: &Manifest) -> serde_json::Result<String> {
    // Value maps are ordered by key, which sorts the flattened extras too
    let value = serde_json::to_value(manifest)?;
    serde_json::to_string_pretty(&value)
}

/// Write the manifest back to `path`.
pub fn save(manifest: &Manifest, path: &Path) -> Result<()> {
    let content = to_json_string(manifest).map_err(|source| HashgenError::Json {
        source,
        path: path.to_path_buf(),
    })?;
    atomic_write(path, &content)?;

    tracing::info!("Manifest written to {:?}", path);
    Ok(())
}

/// Run the whole pipeline: load, hash every entry, then save unless checking.
pub fn refresh<P: FnMut(&Path)>(
    path: &Path,
    options: &RefreshOptions,
    progress: P,
) -> Result<RefreshReport> {
    tracing::info!("Refreshing hashes in {:?}", path);

    let mut manifest = load(path)?;
    let entries = refresh_entries(
        &mut manifest,
        &manifest_dir(path),
        options.block_size,
        progress,
    )?;

    if !options.check {
        save(&manifest, path)?;
    }

    Ok(RefreshReport {
        manifest: path.to_path_buf(),
        entries,
        written: !options.check,
    })
}
