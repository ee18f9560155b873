//! Legacy `download.cfg` pipeline
//!
//! The `songs`, `bibles` and `themes` sections name a base directory and a
//! comma-separated list of item ids. Each id selects an item section
//! (`songs_<id>`, `bible_<id>`, `theme_<id>`) holding `filename` and `sha256`.

mod ini;

pub use ini::{IniDocument, Section};

use super::{
    Category, EntryOutcome, HashedEntry, RefreshOptions, RefreshReport, manifest_dir,
    refresh_entry,
};
use crate::error::{HashgenError, Result};
use crate::util::fs::atomic_write;
use std::path::{Path, PathBuf};

/// Default manifest location, relative to the scripts directory
pub const DEFAULT_MANIFEST: &str = "../download.cfg";

/// Comment written as the first line of a rewritten manifest
pub const DEFAULT_HEADER: &str =
    "# The most recent version should be added to http://openlp.org/files/frw/download.cfg";

const DIRECTORY_KEY: &str = "directory";
const FILENAME_KEY: &str = "filename";
const SHA256_KEY: &str = "sha256";

/// How one category is laid out in the document
struct CategorySchema {
    category: Category,
    section: &'static str,
    list_key: &'static str,
    item_prefix: &'static str,
}

const SCHEMAS: [CategorySchema; 3] = [
    CategorySchema {
        category: Category::Songs,
        section: "songs",
        list_key: "languages",
        item_prefix: "songs_",
    },
    CategorySchema {
        category: Category::Bibles,
        section: "bibles",
        list_key: "translations",
        item_prefix: "bible_",
    },
    CategorySchema {
        category: Category::Themes,
        section: "themes",
        list_key: "files",
        item_prefix: "theme_",
    },
];

impl HashedEntry for Section {
    fn file_name(&self) -> &str {
        // presence checked by CfgLayout::from_document
        self.get(FILENAME_KEY).unwrap_or_default()
    }

    fn sha256(&self) -> Option<&str> {
        self.get(SHA256_KEY)
    }

    fn set_sha256(&mut self, digest: String) {
        self.set(SHA256_KEY, digest);
    }
}

/// One item section to hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgItem {
    pub id: String,
    pub section: String,
}

/// Validated view of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgCategory {
    pub category: Category,
    /// Directory as written in the manifest
    pub directory: String,
    pub items: Vec<CfgItem>,
}

/// Every category and item section the document refers to, checked up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgLayout {
    pub categories: Vec<CfgCategory>,
}

impl CfgLayout {
    /// Resolve and validate every referenced section before anything is hashed.
    pub fn from_document(doc: &IniDocument) -> Result<Self> {
        let mut categories = Vec::with_capacity(SCHEMAS.len());

        for schema in &SCHEMAS {
            let directory = doc.require(schema.section, DIRECTORY_KEY)?.to_string();
            let list = doc.require(schema.section, schema.list_key)?;

            let mut items = Vec::new();
            for id in list.split(',').map(str::trim) {
                if id.is_empty() {
                    return Err(HashgenError::EmptySubkey {
                        section: schema.section.to_string(),
                        key: schema.list_key.to_string(),
                    });
                }
                let section = format!("{}{}", schema.item_prefix, id);
                doc.require(&section, FILENAME_KEY)?;
                items.push(CfgItem {
                    id: id.to_string(),
                    section,
                });
            }

            categories.push(CfgCategory {
                category: schema.category,
                directory,
                items,
            });
        }

        Ok(Self { categories })
    }

    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Loaded `download.cfg` document together with its validated layout
#[derive(Debug, Clone)]
pub struct CfgManifest {
    pub document: IniDocument,
    pub layout: CfgLayout,
}

/// Load and validate a manifest.
pub fn load(path: &Path) -> Result<CfgManifest> {
    if !path.exists() {
        return Err(HashgenError::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| HashgenError::io(path, e))?;
    let document = IniDocument::parse(&text, path)?;
    let layout = CfgLayout::from_document(&document)?;

    tracing::debug!(
        "Loaded {:?} with {} entries",
        path,
        layout.entry_count()
    );
    Ok(CfgManifest { document, layout })
}

/// Hash every item section, resolving directories against `base_dir`.
pub fn refresh_entries<P: FnMut(&Path)>(
    manifest: &mut CfgManifest,
    base_dir: &Path,
    block_size: usize,
    mut progress: P,
) -> Result<Vec<EntryOutcome>> {
    let mut outcomes = Vec::with_capacity(manifest.layout.entry_count());

    for category in &manifest.layout.categories {
        let folder: PathBuf = base_dir.join(&category.directory);
        for item in &category.items {
            let section = manifest
                .document
                .section_mut(&item.section)
                .ok_or_else(|| HashgenError::MissingSection {
                    section: item.section.clone(),
                })?;
            outcomes.push(refresh_entry(
                section,
                category.category,
                &item.id,
                &folder,
                block_size,
                &mut progress,
            )?);
        }
    }

    Ok(outcomes)
}

/// Write the manifest back, header comment first.
pub fn save(manifest: &CfgManifest, path: &Path, header: &str) -> Result<()> {
    atomic_write(path, &manifest.document.render(header))?;
    tracing::info!("Manifest written to {:?}", path);
    Ok(())
}

/// Run the whole pipeline: load, hash every entry, then save unless checking.
pub fn refresh<P: FnMut(&Path)>(
    path: &Path,
    header: &str,
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
        save(&manifest, path, header)?;
    }

    Ok(RefreshReport {
        manifest: path.to_path_buf(),
        entries,
        written: !options.check,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[songs]
directory = songs
languages = en, de

[songs_en]
title = English
filename = en.sqlite

[songs_de]
filename = de.sqlite
sha256 = old

[bibles]
directory = bibles
translations = kjv

[bible_kjv]
filename = kjv.sqlite

[themes]
directory = themes
files = blue

[theme_blue]
filename = blue.otz
";

    fn doc(text: &str) -> IniDocument {
        IniDocument::parse(text, Path::new("download.cfg")).unwrap()
    }

    #[test]
    fn test_layout_resolves_item_sections() {
        let layout = CfgLayout::from_document(&doc(SAMPLE)).unwrap();

        assert_eq!(layout.entry_count(), 4);
        let songs = &layout.categories[0];
        assert_eq!(songs.category, Category::Songs);
        assert_eq!(songs.directory, "songs");
        let sections: Vec<_> = songs.items.iter().map(|i| i.section.as_str()).collect();
        assert_eq!(sections, vec!["songs_en", "songs_de"]);
        assert_eq!(layout.categories[1].items[0].section, "bible_kjv");
        assert_eq!(layout.categories[2].items[0].section, "theme_blue");
    }

    #[test]
    fn test_layout_missing_item_section() {
        let text = SAMPLE.replace("files = blue", "files = blue,red");
        let err = CfgLayout::from_document(&doc(&text)).unwrap_err();
        match err {
            HashgenError::MissingSection { section } => assert_eq!(section, "theme_red"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_layout_missing_filename() {
        let text = SAMPLE.replace("filename = kjv.sqlite", "name = kjv");
        let err = CfgLayout::from_document(&doc(&text)).unwrap_err();
        assert!(matches!(err, HashgenError::MissingKey { ref key, .. } if key == "filename"));
    }

    #[test]
    fn test_layout_empty_list_item() {
        let text = SAMPLE.replace("translations = kjv", "translations = kjv,");
        let err = CfgLayout::from_document(&doc(&text)).unwrap_err();
        assert!(matches!(err, HashgenError::EmptySubkey { .. }));
    }

    #[test]
    fn test_section_as_hashed_entry() {
        let mut d = doc(SAMPLE);
        let section = d.section_mut("songs_de").unwrap();
        assert_eq!(section.file_name(), "de.sqlite");
        assert_eq!(section.sha256(), Some("old"));
        section.set_sha256("new".to_string());
        assert_eq!(section.get("sha256"), Some("new"));
    }
}
