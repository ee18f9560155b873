//! Section-based key/value document
//!
//! Reads and writes the `download.cfg` dialect: `[section]` headers,
//! `key = value` (or `key: value`) lines, `#`/`;` comment lines and indented
//! continuation lines. Keys are case-insensitive and stored lowercased.
//! Section and key order is preserved so a rewrite only changes values.

use crate::error::{HashgenError, Result};
use std::path::Path;

/// One `[name]` block and its keys in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, replacing it in place or appending a new key.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// Parsed document, sections in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    /// Parse document text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut doc = IniDocument::default();
        // Key of the last value line, for continuation lines
        let mut last_key: Option<String> = None;
        // Indent of the last line that was not a continuation
        let mut indent_level = 0usize;
        // Blank lines seen since the last value line
        let mut pending_blank = 0usize;

        let parse_error = |line: usize, message: String| HashgenError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if last_key.is_some() {
                    pending_blank += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Lines indented deeper than their key continue its value;
            // blank lines in between are kept, trailing ones are dropped.
            let indent = line.len() - line.trim_start().len();
            if indent > indent_level {
                if let (Some(key), Some(section)) = (&last_key, doc.sections.last_mut()) {
                    if let Some((_, value)) = section.entries.iter_mut().find(|(k, _)| k == key) {
                        for _ in 0..=pending_blank {
                            value.push('\n');
                        }
                        value.push_str(trimmed);
                        pending_blank = 0;
                        continue;
                    }
                }
            }
            pending_blank = 0;
            indent_level = indent;

            if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.rfind(']').map(|end| &rest[..end]))
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| {
                        parse_error(line_no, format!("malformed section header: {}", trimmed))
                    })?;
                if doc.section(name).is_some() {
                    return Err(parse_error(
                        line_no,
                        format!("section [{}] already exists", name),
                    ));
                }
                doc.sections.push(Section::new(name));
                last_key = None;
                continue;
            }

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(parse_error(
                    line_no,
                    format!("expected 'key = value', found: {}", trimmed),
                ));
            };
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty key".to_string()));
            }

            let Some(section) = doc.sections.last_mut() else {
                return Err(parse_error(
                    line_no,
                    format!("key '{}' appears before any section header", key),
                ));
            };
            if section.get(&key).is_some() {
                return Err(parse_error(
                    line_no,
                    format!("key '{}' already exists in section [{}]", key, section.name),
                ));
            }
            section.entries.push((key.clone(), value.to_string()));
            last_key = Some(key);
        }

        Ok(doc)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Look up a required value, failing with the section/key that is missing.
    pub fn require(&self, section: &str, key: &str) -> Result<&str> {
        let found = self
            .section(section)
            .ok_or_else(|| HashgenError::MissingSection {
                section: section.to_string(),
            })?;
        found.get(key).ok_or_else(|| HashgenError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    /// Serialize the document, preceded by `header` when it is not empty.
    ///
    /// Header lines are written as comments, prefixing `# ` where needed.
    /// Each section ends with a blank line; multi-line values continue on
    /// tab-indented lines.
    pub fn render(&self, header: &str) -> String {
        let mut out = String::new();
        for line in header.trim_end().lines() {
            let line = line.trim_end();
            if !line.is_empty() && !line.starts_with('#') && !line.starts_with(';') {
                out.push_str("# ");
            }
            out.push_str(line);
            out.push('\n');
        }
        for section in &self.sections {
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&value.replace('\n', "\n\t"));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<IniDocument> {
        IniDocument::parse(text, Path::new("download.cfg"))
    }

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = parse(
            "# comment\n[songs]\nDirectory = songs\nlanguages: en,de\n\n; other\n[songs_en]\nfilename=en.sqlite\n",
        )
        .unwrap();

        let names: Vec<_> = doc.sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["songs", "songs_en"]);
        assert_eq!(doc.require("songs", "directory").unwrap(), "songs");
        assert_eq!(doc.require("songs", "LANGUAGES").unwrap(), "en,de");
        assert_eq!(doc.require("songs_en", "filename").unwrap(), "en.sqlite");
    }

    #[test]
    fn test_value_may_contain_delimiters() {
        let doc = parse("[x]\nurl = http://example.org/a=b\n").unwrap();
        assert_eq!(doc.require("x", "url").unwrap(), "http://example.org/a=b");
    }

    #[test]
    fn test_continuation_lines() {
        let doc = parse("[x]\ndescription = first\n  second\n").unwrap();
        assert_eq!(doc.require("x", "description").unwrap(), "first\nsecond");
        assert_eq!(
            doc.render(""),
            "[x]\ndescription = first\n\tsecond\n\n"
        );
    }

    #[test]
    fn test_blank_lines_inside_values() {
        let doc = parse("[x]\ndescription = first\n\n  second\n\n\nnext = 1\n").unwrap();
        assert_eq!(doc.require("x", "description").unwrap(), "first\n\nsecond");
        assert_eq!(doc.require("x", "next").unwrap(), "1");

        let rendered = doc.render("");
        assert_eq!(
            rendered,
            "[x]\ndescription = first\n\t\n\tsecond\nnext = 1\n\n"
        );
        assert_eq!(parse(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_comments_do_not_end_values() {
        let doc = parse("[x]\ndescription = first\n# note\n  second\n").unwrap();
        assert_eq!(doc.require("x", "description").unwrap(), "first\nsecond");
    }

    #[test]
    fn test_indented_keys_are_not_continuations_of_each_other() {
        let doc = parse("[x]\n  a = 1\n  b = 2\n").unwrap();
        assert_eq!(doc.require("x", "a").unwrap(), "1");
        assert_eq!(doc.require("x", "b").unwrap(), "2");
    }

    #[test]
    fn test_key_before_section_is_error() {
        let err = parse("key = value\n").unwrap_err();
        assert!(matches!(err, HashgenError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_line_without_delimiter_is_error() {
        let err = parse("[x]\njust words\n").unwrap_err();
        assert!(matches!(err, HashgenError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_duplicates_are_errors() {
        assert!(parse("[x]\n[x]\n").is_err());
        assert!(parse("[x]\na = 1\nA = 2\n").is_err());
    }

    #[test]
    fn test_missing_lookups() {
        let doc = parse("[x]\na = 1\n").unwrap();
        assert!(matches!(
            doc.require("y", "a"),
            Err(HashgenError::MissingSection { .. })
        ));
        assert!(matches!(
            doc.require("x", "b"),
            Err(HashgenError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_set_replaces_in_place_or_appends() {
        let mut doc = parse("[x]\nsha256 = old\nfilename = a\n").unwrap();
        let section = doc.section_mut("x").unwrap();
        section.set("sha256", "new");
        section.set("size", "3");

        let keys: Vec<_> = section.keys().collect();
        assert_eq!(keys, vec!["sha256", "filename", "size"]);
        assert_eq!(section.get("sha256"), Some("new"));
    }

    #[test]
    fn test_render_format() {
        let doc = parse("[a]\nk=v\nempty =\n[b]\nx : y\n").unwrap();
        assert_eq!(
            doc.render("# header"),
            "# header\n[a]\nk = v\nempty = \n\n[b]\nx = y\n\n"
        );
    }

    #[test]
    fn test_header_lines_become_comments() {
        let doc = parse("[a]\nk = v\n").unwrap();
        let rendered = doc.render("Mirror of the upstream manifest\n; second line");
        assert_eq!(
            rendered,
            "# Mirror of the upstream manifest\n; second line\n[a]\nk = v\n\n"
        );
        assert_eq!(parse(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_render_then_parse_is_stable() {
        let doc = parse("[a]\nk = v\n\n[b]\nx = y\n").unwrap();
        let rendered = doc.render("# header");
        let again = parse(&rendered).unwrap();
        assert_eq!(again, doc);
        assert_eq!(again.render("# header"), rendered);
    }
}
