//! Pattern catalog for the Liquid fragment humanizer.
//!
//! A catalog is a JSON (or YAML) document describing named tag patterns with
//! mode-specific templates, plus dictionaries of variables, filters and
//! operators used when rewriting fragments into prose.
//!
//! Loading is lenient: an entry that fails to deserialize, or whose regex
//! fails to compile, is dropped and recorded as a [`CatalogWarning`]. Only
//! document-level problems (missing file, unparsable document) are errors.
//!
//! # Example
//!
//! ```
//! use lens_catalog::PatternCatalog;
//!
//! let catalog = PatternCatalog::from_json_str(r#"{
//!     "patterns": {
//!         "endif": { "regex": "^endif$", "friendly": "End condition" },
//!         "broken": { "regex": "(unclosed" }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(catalog.patterns().len(), 1);
//! assert_eq!(catalog.warnings().len(), 1);
//! ```

pub mod builtin;
mod entry;
mod error;
mod mode;
mod store;

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use serde::Deserialize;
use serde_json::{Map, Value};

pub use entry::{
    DEFAULT_PRIORITY, DynamicPattern, FallbackTransformation, FilterEntry, Groups, NamedPattern,
    OperatorEntry, PatternEntry, VariableEntry,
};
use error::EntryError;
pub use error::{CatalogError, CatalogWarning};
pub use mode::{DisplayMode, DisplayModeInfo, ParseDisplayModeError};
pub use store::CatalogStore;

/// Loaded, immutable pattern catalog.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    display_modes: Vec<(String, DisplayModeInfo)>,
    patterns: Vec<PatternEntry>,
    variables: HashMap<String, VariableEntry>,
    filters: HashMap<String, FilterEntry>,
    operators: Vec<OperatorEntry>,
    styling: Map<String, Value>,
    fallback_tag_patterns: Vec<NamedPattern>,
    output_patterns: Vec<NamedPattern>,
    friendly_transformations: Vec<FallbackTransformation>,
    technical_transformations: Vec<FallbackTransformation>,
    dynamic_patterns: HashMap<String, DynamicPattern>,
    common_variable_mappings: HashMap<String, String>,
    warnings: Vec<CatalogWarning>,
}

impl PatternCatalog {
    /// Catalog with no entries. The engine runs on built-in tables alone.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog bundled with this crate.
    ///
    /// Falls back to [`PatternCatalog::empty`] if the bundled document is unusable.
    #[must_use]
    pub fn builtin() -> Self {
        match Self::from_json_str(builtin::DEFAULT_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "Bundled catalog is invalid, using empty catalog");
                Self::empty()
            }
        }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Parse a catalog from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(&value)
    }

    /// Build a catalog from an already-parsed document.
    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        let root = value.as_object().ok_or(CatalogError::NotAnObject)?;
        let mut loader = Loader::default();

        let display_modes = loader.entries(root, "displayModes", |_, v| {
            Ok(DisplayModeInfo::deserialize(v)?)
        });

        let mut patterns: Vec<PatternEntry> = loader
            .entries(root, "patterns", PatternEntry::from_value)
            .into_iter()
            .map(|(_, entry)| entry)
            .collect();
        // Stable: equal priorities keep document order.
        patterns.sort_by_key(|p| p.priority);

        let variables = loader
            .entries(root, "variables", |_, v| Ok(VariableEntry::deserialize(v)?))
            .into_iter()
            .collect();
        let filters = loader
            .entries(root, "filters", |_, v| Ok(FilterEntry::deserialize(v)?))
            .into_iter()
            .collect();

        let mut operators: Vec<OperatorEntry> = loader
            .entries(root, "operators", OperatorEntry::from_value)
            .into_iter()
            .map(|(_, entry)| entry)
            .collect();
        operators.sort_by_key(|op| std::cmp::Reverse(op.symbol.len()));

        let styling = loader.section(root, "styling").cloned().unwrap_or_default();

        let fallback_tag_patterns = loader
            .entries(root, "fallbackTagPatterns", NamedPattern::from_value)
            .into_iter()
            .map(|(_, p)| p)
            .collect();
        let output_patterns = loader
            .entries(root, "outputPatterns", NamedPattern::from_value)
            .into_iter()
            .map(|(_, p)| p)
            .collect();

        let (friendly_transformations, technical_transformations) =
            loader.transformations(root);

        let dynamic_patterns = loader
            .entries(root, "dynamicPatterns", |_, v| Ok(DynamicPattern::deserialize(v)?))
            .into_iter()
            .collect();
        let common_variable_mappings = loader
            .entries(root, "commonVariableMappings", |_, v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| EntryError::Field("value must be a string".to_owned()))
            })
            .into_iter()
            .map(|(key, v)| (key.to_lowercase(), v))
            .collect();

        let catalog = Self {
            display_modes,
            patterns,
            variables,
            filters,
            operators,
            styling,
            fallback_tag_patterns,
            output_patterns,
            friendly_transformations,
            technical_transformations,
            dynamic_patterns,
            common_variable_mappings,
            warnings: loader.warnings,
        };

        tracing::debug!(
            patterns = catalog.patterns.len(),
            variables = catalog.variables.len(),
            filters = catalog.filters.len(),
            operators = catalog.operators.len(),
            warnings = catalog.warnings.len(),
            "Catalog parsed"
        );

        Ok(catalog)
    }

    /// Load a catalog file. The format is chosen by extension (`.json`, `.yaml`, `.yml`).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let start = Instant::now();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = std::fs::read_to_string(path)?;
        let catalog = match extension.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::info!(
            path = %path.display(),
            patterns = catalog.patterns.len(),
            warnings = catalog.warnings.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Tag patterns in ascending priority order.
    #[must_use]
    pub fn patterns(&self) -> &[PatternEntry] {
        &self.patterns
    }

    #[must_use]
    pub fn variable(&self, key: &str) -> Option<&VariableEntry> {
        self.variables.get(key)
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&FilterEntry> {
        self.filters.get(name)
    }

    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Operators, longest symbol first.
    #[must_use]
    pub fn operators(&self) -> &[OperatorEntry] {
        &self.operators
    }

    /// Styling object for `mode`, passed through untouched.
    #[must_use]
    pub fn styling(&self, mode: DisplayMode) -> Option<&Value> {
        self.styling.get(mode.as_str())
    }

    #[must_use]
    pub fn fallback_tag_patterns(&self) -> &[NamedPattern] {
        &self.fallback_tag_patterns
    }

    #[must_use]
    pub fn output_patterns(&self) -> &[NamedPattern] {
        &self.output_patterns
    }

    /// Catalog-supplied fallback transformations for `mode`.
    #[must_use]
    pub fn fallback_transformations(&self, mode: DisplayMode) -> &[FallbackTransformation] {
        match mode {
            DisplayMode::Friendly => &self.friendly_transformations,
            DisplayMode::Technical => &self.technical_transformations,
        }
    }

    #[must_use]
    pub fn dynamic_pattern(&self, object: &str) -> Option<&DynamicPattern> {
        self.dynamic_patterns.get(object)
    }

    /// Phrase for an identifier from `commonVariableMappings` (case-insensitive).
    #[must_use]
    pub fn common_mapping(&self, identifier: &str) -> Option<&str> {
        self.common_variable_mappings
            .get(&identifier.to_lowercase())
            .map(String::as_str)
    }

    /// Presentation flags for `mode`, built-in flags if the catalog has none.
    #[must_use]
    pub fn display_mode_info(&self, mode: DisplayMode) -> DisplayModeInfo {
        self.display_modes
            .iter()
            .find(|(key, _)| key == mode.as_str())
            .map_or_else(|| DisplayModeInfo::builtin(mode), |(_, info)| info.clone())
    }

    /// Entries dropped while loading.
    #[must_use]
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }
}

/// Collects warnings while converting catalog sections.
#[derive(Default)]
struct Loader {
    warnings: Vec<CatalogWarning>,
}

impl Loader {
    fn warn(&mut self, section: &str, name: &str, message: String) {
        tracing::warn!(section, entry = name, "Dropped catalog entry: {message}");
        self.warnings.push(CatalogWarning {
            section: section.to_owned(),
            name: name.to_owned(),
            message,
        });
    }

    /// Object-valued section, or `None` when missing or malformed.
    fn section<'a>(
        &mut self,
        root: &'a Map<String, Value>,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        match root.get(key)? {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => {
                self.warn(key, "*", "section must be an object".to_owned());
                None
            }
        }
    }

    /// Convert each entry of an object-valued section, in document order.
    fn entries<T>(
        &mut self,
        root: &Map<String, Value>,
        key: &str,
        convert: impl Fn(&str, &Value) -> Result<T, EntryError>,
    ) -> Vec<(String, T)> {
        let Some(section) = self.section(root, key) else {
            return Vec::new();
        };
        let mut converted = Vec::with_capacity(section.len());
        for (name, value) in section {
            match convert(name, value) {
                Ok(entry) => converted.push((name.clone(), entry)),
                Err(e) => self.warn(key, name, e.to_string()),
            }
        }
        converted
    }

    fn transformations(
        &mut self,
        root: &Map<String, Value>,
    ) -> (Vec<FallbackTransformation>, Vec<FallbackTransformation>) {
        const KEY: &str = "fallbackTransformations";
        let Some(section) = self.section(root, KEY) else {
            return (Vec::new(), Vec::new());
        };
        let mut list = |mode: DisplayMode| {
            let Some(value) = section.get(mode.as_str()) else {
                return Vec::new();
            };
            let Some(items) = value.as_array() else {
                self.warn(KEY, mode.as_str(), "must be an array".to_owned());
                return Vec::new();
            };
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match FallbackTransformation::from_value(item) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        self.warn(KEY, &format!("{}[{i}]", mode.as_str()), e.to_string());
                        None
                    }
                })
                .collect()
        };
        let friendly = list(DisplayMode::Friendly);
        let technical = list(DisplayMode::Technical);
        (friendly, technical)
    }
}
