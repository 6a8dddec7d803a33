//! Catalog error types.

use std::path::PathBuf;

/// Error loading a pattern catalog as a whole.
///
/// Problems with individual entries never produce this error; they are
/// collected as [`CatalogWarning`]s on the loaded catalog instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file not found.
    #[error("Catalog file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// File extension is neither JSON nor YAML.
    #[error("Unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// The document root is not an object.
    #[error("Catalog root must be an object")]
    NotAnObject,
}

/// Error converting a single catalog entry.
#[derive(Debug, thiserror::Error)]
pub(crate) enum EntryError {
    #[error("invalid entry: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("invalid regex: {0}")]
    Regex(#[from] fancy_regex::Error),
    #[error("{0}")]
    Field(String),
}

/// A catalog entry that was dropped while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogWarning {
    /// Top-level section the entry belongs to (e.g. `patterns`).
    pub section: String,
    /// Entry key within the section.
    pub name: String,
    /// Why the entry was dropped.
    pub message: String,
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.name, self.message)
    }
}
