//! # Catalog Extraction
//!
//! Turns a checked-out catalog repository into [`CatalogEntry`] values.
//!
//! The fetcher only knows the [`CatalogReader`] trait; [`DirectoryReader`] is
//! the implementation used by default. It never writes to the tree it reads.
//!
//! ## Layout understood by `DirectoryReader`
//!
//! - Every `*.yaml`, `*.yml` and `*.json` file outside hidden directories is a
//!   catalog file.
//! - A YAML file holds one entry, a list of entries, or several `---`
//!   separated documents. A JSON file holds one entry or an array.
//! - A `.catalogignore` file at the root lists glob patterns, one per line, of
//!   files to skip (test fixtures, drafts). `#` starts a comment.
//! - Every entry needs a non-empty `name` and `description`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::debug;
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::defaults::{CATALOG_EXTENSIONS, CATALOG_IGNORE_FILE};
use crate::error::{Error, Result};

/// One manifest describing an installable MCP server.
///
/// Only `name` and `description` are interpreted; the remaining fields are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Reads catalog entries out of a checked-out tree.
pub trait CatalogReader: Send + Sync {
    /// Read every entry below `dir`. Must not modify the tree.
    fn read_catalog(&self, dir: &Path) -> Result<Vec<CatalogEntry>>;
}

impl<F> CatalogReader for F
where
    F: Fn(&Path) -> Result<Vec<CatalogEntry>> + Send + Sync,
{
    fn read_catalog(&self, dir: &Path) -> Result<Vec<CatalogEntry>> {
        self(dir)
    }
}

/// The default reader, walking the tree for YAML and JSON manifests.
#[derive(Debug, Clone, Default)]
pub struct DirectoryReader;

impl DirectoryReader {
    pub fn new() -> Self {
        Self
    }
}

impl CatalogReader for DirectoryReader {
    fn read_catalog(&self, dir: &Path) -> Result<Vec<CatalogEntry>> {
        let ignore = IgnoreList::load(dir)?;
        let mut entries = Vec::new();

        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !has_catalog_extension(entry.path()) {
                continue;
            }

            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            if ignore.is_ignored(relative) {
                debug!("skipping ignored catalog file {}", relative.display());
                continue;
            }

            let found = read_catalog_file(entry.path(), relative)?;
            debug!("read {} entries from {}", found.len(), relative.display());
            entries.extend(found);
        }

        Ok(entries)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn has_catalog_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CATALOG_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Patterns from `.catalogignore`.
#[derive(Debug, Default)]
struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    fn load(root: &Path) -> Result<Self> {
        let path = root.join(CATALOG_IGNORE_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::parse(&fs::read_to_string(&path)?)
    }

    fn parse(content: &str) -> Result<Self> {
        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| Pattern::new(line.trim_start_matches('/')))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A pattern matches either the path relative to the root or, for
    /// patterns without a slash, the bare file name.
    fn is_ignored(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let normalized = relative.to_string_lossy().replace('\\', "/");
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.patterns.iter().any(|pattern| {
            pattern.matches_with(&normalized, options)
                || (!pattern.as_str().contains('/') && pattern.matches_with(&file_name, options))
        })
    }
}

fn read_catalog_file(path: &Path, relative: &Path) -> Result<Vec<CatalogEntry>> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let entries = if is_json {
        parse_json(&content).map_err(|message| catalog_error(relative, message))?
    } else {
        parse_yaml(&content).map_err(|message| catalog_error(relative, message))?
    };

    for entry in &entries {
        if entry.name.trim().is_empty() {
            return Err(catalog_error(relative, "entry has no name".to_string()));
        }
        if entry.description.trim().is_empty() {
            return Err(catalog_error(
                relative,
                format!("entry '{}' has no description", entry.name),
            ));
        }
    }
    Ok(entries)
}

fn catalog_error(relative: &Path, message: String) -> Error {
    Error::Catalog {
        path: PathBuf::from(relative),
        message,
    }
}

fn parse_yaml(content: &str) -> std::result::Result<Vec<CatalogEntry>, String> {
    let mut entries = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document).map_err(|e| e.to_string())?;
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Sequence(items) => {
                for item in items {
                    entries.push(serde_yaml::from_value(item).map_err(|e| e.to_string())?);
                }
            }
            serde_yaml::Value::Mapping(_) => {
                entries.push(serde_yaml::from_value(value).map_err(|e| e.to_string())?);
            }
            _ => return Err("expected a mapping or a list of mappings".to_string()),
        }
    }
    Ok(entries)
}

fn parse_json(content: &str) -> std::result::Result<Vec<CatalogEntry>, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| e.to_string()))
            .collect(),
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(|entry| vec![entry])
            .map_err(|e| e.to_string()),
        _ => Err("expected an object or an array of objects".to_string()),
    }
}
