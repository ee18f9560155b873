//! JSON manifest schema
//!
//! Only the fields the refresher needs are typed. Everything else is kept in
//! the `extra` maps and written back unchanged.

use crate::manifest::HashedEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Root of `download_3.0.conf`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "_meta")]
    pub meta: Meta,
    pub songs: BTreeMap<String, Resource>,
    pub bibles: BTreeMap<String, BibleLanguage>,
    pub themes: BTreeMap<String, Resource>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `_meta` block: base directory per category, relative to the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub songs_dir: String,
    pub bibles_dir: String,
    pub themes_dir: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A downloadable file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub file_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bible translations grouped under a language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibleLanguage {
    pub translations: BTreeMap<String, Resource>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HashedEntry for Resource {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    fn set_sha256(&mut self, digest: String) {
        self.sha256 = Some(digest);
    }
}

impl Manifest {
    pub fn entry_count(&self) -> usize {
        self.songs.len()
            + self
                .bibles
                .values()
                .map(|lang| lang.translations.len())
                .sum::<usize>()
            + self.themes.len()
    }
}
