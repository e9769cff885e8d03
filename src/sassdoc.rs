//! Flattened SassDoc documents.
//!
//! Every package can ship the style documentation for its Sass API as a
//! `sassdoc.json` next to its demos:
//!
//! ```text
//! content/packages/theme/
//! ├── demos/
//! └── sassdoc.json
//! ```
//!
//! The document is already flattened by whatever tool produced it: three
//! maps keyed by item name, one each for variables, functions and mixins.
//! Field names follow the upstream camelCase JSON (`sourceLink`). Unknown
//! fields are ignored so newer generators keep working.
//!
//! Loading goes through the [`SassDocLoader`] trait; the scanner only needs
//! `load(name)` and does not care where documents come from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SASSDOC_FILENAME: &str = "sassdoc.json";

#[derive(Error, Debug)]
pub enum SassDocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid sassdoc.json for package {package}: {source}")]
    Json {
        package: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A package's style documentation, keyed by item name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenedSassDoc {
    pub variables: BTreeMap<String, SassDocItem>,
    pub functions: BTreeMap<String, SassDocItem>,
    pub mixins: BTreeMap<String, SassDocItem>,
}

impl FlattenedSassDoc {
    pub fn len(&self) -> usize {
        self.variables.len() + self.functions.len() + self.mixins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The three item groups with their section headings, in display order.
    pub fn groups(&self) -> [(&'static str, &BTreeMap<String, SassDocItem>); 3] {
        [
            ("Variables", &self.variables),
            ("Functions", &self.functions),
            ("Mixins", &self.mixins),
        ]
    }

    /// Fill in item names that the document left out with their map keys.
    fn fill_names(&mut self) {
        for group in [&mut self.variables, &mut self.functions, &mut self.mixins] {
            for (key, item) in group.iter_mut() {
                if item.name.is_empty() {
                    item.name = key.clone();
                }
            }
        }
    }
}

/// A single variable, function, or mixin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SassDocItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared type, for variables.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Default value, for variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Full source of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SassDocParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<SassDocReturn>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<SassDocExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SassDocParameter {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SassDocReturn {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SassDocExample {
    pub code: String,
    /// Code language (`scss`, `css`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Compiled CSS output of the example, when the generator provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiled: Option<String>,
}

/// Source of SassDoc documents by package name.
pub trait SassDocLoader {
    /// Load the document for `name`. `Ok(None)` means the package has none.
    fn load(&self, name: &str) -> Result<Option<FlattenedSassDoc>, SassDocError>;
}

/// Loads `<packages_dir>/<name>/sassdoc.json`.
#[derive(Debug, Clone)]
pub struct FsSassDocLoader {
    packages_dir: PathBuf,
}

impl FsSassDocLoader {
    pub fn new(packages_dir: impl Into<PathBuf>) -> Self {
        Self {
            packages_dir: packages_dir.into(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.packages_dir.join(name).join(SASSDOC_FILENAME)
    }
}

impl SassDocLoader for FsSassDocLoader {
    fn load(&self, name: &str) -> Result<Option<FlattenedSassDoc>, SassDocError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        parse_sassdoc(name, &fs::read_to_string(&path)?).map(Some)
    }
}

/// In-memory documents, keyed by package name.
impl SassDocLoader for BTreeMap<String, FlattenedSassDoc> {
    fn load(&self, name: &str) -> Result<Option<FlattenedSassDoc>, SassDocError> {
        Ok(self.get(name).cloned())
    }
}

/// Parse a `sassdoc.json` document for `package`.
pub fn parse_sassdoc(package: &str, json: &str) -> Result<FlattenedSassDoc, SassDocError> {
    let mut doc: FlattenedSassDoc =
        serde_json::from_str(json).map_err(|source| SassDocError::Json {
            package: package.to_string(),
            source,
        })?;
    doc.fill_names();
    Ok(doc)
}

/// True when `dir` looks like it holds a SassDoc document.
pub fn has_sassdoc(dir: &Path) -> bool {
    dir.join(SASSDOC_FILENAME).is_file()
}
