//! Catalog schema definitions for langcheck.
//!
//! A catalog maps language names to their definitions: matchers, optional
//! disambiguation heuristics, and a priority weight. The catalog exists in
//! two views: a raw order-preserving view that the validator consumes (it
//! has to see wrong value types to report them), and a strictly typed view
//! consumed by the classifier, collision detector, and diff checker.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The matcher keys recognized inside a `matchers` object.
pub const MATCHER_KEYS: &[&str] = &["extensions", "filenames", "interpreters", "patterns"];

/// Priority assumed when a definition does not set one.
pub const DEFAULT_PRIORITY: u8 = 50;

/// Errors that can occur while loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document cannot be decoded as a mapping of language definitions.
    #[error("malformed catalog document: {0}")]
    MalformedDocument(String),
    /// A pattern or heuristic regex failed to compile.
    #[error("{language}: invalid regex: {source}")]
    InvalidRegex {
        language: String,
        #[source]
        source: regex::Error,
    },
}

/// The catalog as read, before any type checking of definitions.
///
/// Keys are kept in document order; values stay untyped so the validator
/// can report shape problems instead of failing to decode them.
#[derive(Debug, Clone)]
pub struct RawCatalog {
    entries: Vec<(String, Value)>,
}

impl RawCatalog {
    /// Decode a catalog document from a string.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let doc: Value = serde_yaml::from_str(source)
            .map_err(|e| CatalogError::MalformedDocument(e.to_string()))?;
        let mapping = match doc {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            other => {
                return Err(CatalogError::MalformedDocument(format!(
                    "expected a mapping at the top level, got {}",
                    value_kind(&other)
                )))
            }
        };
        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = match key {
                Value::String(s) => s,
                other => {
                    return Err(CatalogError::MalformedDocument(format!(
                        "language names must be strings, got {}",
                        value_kind(&other)
                    )))
                }
            };
            entries.push((name, value));
        }
        Ok(Self { entries })
    }

    /// Read and decode a catalog document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&source)
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Language names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single language definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageDefinition {
    pub category: String,
    pub color: String,
    pub matchers: Matchers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heuristics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(
        rename = "nerd-font-glyph",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nerd_font_glyph: Option<String>,
}

impl LanguageDefinition {
    /// Effective priority, defaulting to the middle of the [0,100] range.
    pub fn priority(&self) -> u8 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    /// Whether this definition carries any disambiguation heuristics.
    pub fn has_heuristics(&self) -> bool {
        !self.heuristics.is_empty()
    }
}

/// The matching rules attached to a language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Matchers {
    /// File extensions including the leading separator, e.g. `.py`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Exact basenames, e.g. `Makefile`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filenames: Vec<String>,
    /// Interpreter program names matched against shebang lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpreters: Vec<String>,
    /// Content-matching regular expressions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
}

/// The strictly typed catalog, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(String, LanguageDefinition)>,
}

impl Catalog {
    /// Decode a catalog from a string, failing on any shape mismatch.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        Self::from_raw(&RawCatalog::from_yaml(source)?)
    }

    /// Read and decode a catalog from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        Self::from_raw(&RawCatalog::load(path)?)
    }

    /// Strictly decode every definition of a raw catalog.
    pub fn from_raw(raw: &RawCatalog) -> Result<Self, CatalogError> {
        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw.iter() {
            let def: LanguageDefinition = serde_yaml::from_value(value.clone())
                .map_err(|e| CatalogError::MalformedDocument(format!("{}: {}", name, e)))?;
            entries.push((name.to_string(), def));
        }
        Ok(Self { entries })
    }

    /// Serialize back to YAML, preserving entry order.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        let mut doc = Mapping::new();
        for (name, def) in &self.entries {
            let value = serde_yaml::to_value(def)
                .map_err(|e| CatalogError::MalformedDocument(e.to_string()))?;
            doc.insert(Value::String(name.clone()), value);
        }
        serde_yaml::to_string(&doc).map_err(|e| CatalogError::MalformedDocument(e.to_string()))
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageDefinition)> {
        self.entries.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Language names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Look up a definition by exact name.
    pub fn get(&self, name: &str) -> Option<&LanguageDefinition> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human-readable name for a YAML value's type, used in diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "an object",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r##"
Python:
  category: programming
  color: "#3572A5"
  matchers:
    extensions:
      - .py
    interpreters:
      - python
      - python3
Rust:
  category: programming
  color: "#DEA584"
  matchers:
    extensions:
      - .rs
  priority: 60
"##;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_yaml(SIMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let python = catalog.get("Python").unwrap();
        assert_eq!(python.category, "programming");
        assert_eq!(python.matchers.extensions, vec![".py"]);
        assert_eq!(python.matchers.interpreters, vec!["python", "python3"]);
        assert_eq!(python.priority(), DEFAULT_PRIORITY);
        assert!(!python.has_heuristics());
        assert_eq!(catalog.get("Rust").unwrap().priority(), 60);
    }

    #[test]
    fn test_raw_preserves_document_order() {
        let raw = RawCatalog::from_yaml("B: {}\nA: {}\n").unwrap();
        let names: Vec<_> = raw.names().collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        let err = RawCatalog::from_yaml("- just\n- a\n- list\n").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedDocument(_)));
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn test_empty_document_is_empty_catalog() {
        let raw = RawCatalog::from_yaml("").unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_strict_decode_rejects_bad_shapes() {
        let err = Catalog::from_yaml("Rust:\n  color: \"#DEA584\"\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Rust"), "error should name the language: {}", msg);

        let err = Catalog::from_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers: 3\n",
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedDocument(_)));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let catalog = Catalog::from_yaml(SIMPLE).unwrap();
        let serialized = catalog.to_yaml().unwrap();
        let reloaded = Catalog::from_yaml(&serialized).unwrap();
        assert_eq!(catalog, reloaded);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load("/nonexistent/languages.yaml").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
