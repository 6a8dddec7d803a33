//! Configuration management for lens.
//!
//! Parses `lens.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [catalog]
//! path = "${BRAZE_CATALOGS:-catalogs}/liquid.json"
//! builtin = true
//!
//! [display]
//! mode = "technical"
//! tooltips = false
//! ```
//!
//! `catalog.path` supports `${VAR}` and `${VAR:-default}` expansion and is
//! resolved relative to the config file.

mod expand;

use std::path::{Path, PathBuf};

use lens_catalog::DisplayMode;
use serde::Deserialize;

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override catalog file.
    pub catalog_path: Option<PathBuf>,
    /// Override display mode.
    pub mode: Option<DisplayMode>,
    /// Override tooltip flag.
    pub tooltips: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lens.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog section as written in TOML.
    catalog: CatalogConfigRaw,
    /// Display configuration.
    pub display: DisplayConfig,

    /// Resolved catalog configuration (set after loading).
    #[serde(skip)]
    pub catalog_resolved: CatalogConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogConfigRaw {
    path: Option<String>,
    builtin: Option<bool>,
}

/// Resolved catalog source.
#[derive(Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Catalog file, absolute or relative to the working directory.
    pub path: Option<PathBuf>,
    /// Use the bundled catalog when `path` is unset.
    pub builtin: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            builtin: true,
        }
    }
}

/// Display configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Overrides the catalog's `showTooltips` flag when set.
    pub tooltips: Option<bool>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`catalog.path`").
        field: String,
        /// Error message (e.g., "${`CATALOG_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lens.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = &settings.catalog_path {
            self.catalog_resolved.path = Some(path.clone());
        }
        if let Some(mode) = settings.mode {
            self.display.mode = mode;
        }
        if let Some(tooltips) = settings.tooltips {
            self.display.tooltips = Some(tooltips);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.catalog.path {
            require_non_empty(path, "catalog.path")?;
        }
        if self.catalog_resolved.path.is_none() && !self.catalog_resolved.builtin {
            return Err(ConfigError::Validation(
                "catalog.path is required when catalog.builtin = false".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.catalog.path {
            self.catalog.path = Some(expand::expand_env(path, "catalog.path")?);
        }
        Ok(())
    }

    /// Resolve the catalog path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.catalog_resolved = CatalogConfig {
            path: self
                .catalog
                .path
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(|p| config_dir.join(p)),
            builtin: self.catalog.builtin.unwrap_or(true),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.mode, DisplayMode::Friendly);
        assert!(config.display.tooltips.is_none());
        assert_eq!(config.catalog_resolved, CatalogConfig::default());
    }

    #[test]
    fn test_parse_display_config() {
        let toml = r#"
[display]
mode = "technical"
tooltips = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.display.mode, DisplayMode::Technical);
        assert_eq!(config.display.tooltips, Some(false));
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let toml = r#"
[display]
mode = "loud"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_resolve_catalog_path() {
        let toml = r#"
[catalog]
path = "catalogs/braze.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.catalog_resolved.path,
            Some(PathBuf::from("/project/catalogs/braze.json"))
        );
        assert!(config.catalog_resolved.builtin);
    }

    #[test]
    fn test_empty_catalog_path_rejected() {
        let toml = r#"
[catalog]
path = "  "
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("catalog.path"));
    }

    #[test]
    fn test_builtin_disabled_requires_path() {
        let toml = r"
[catalog]
builtin = false
";
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            catalog_path: Some(PathBuf::from("/tmp/c.json")),
            mode: Some(DisplayMode::Technical),
            tooltips: None,
        });
        assert_eq!(config.catalog_resolved.path, Some(PathBuf::from("/tmp/c.json")));
        assert_eq!(config.display.mode, DisplayMode::Technical);
        assert!(config.display.tooltips.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lens.toml");
        std::fs::write(
            &path,
            "[catalog]\npath = \"liquid.json\"\n\n[display]\nmode = \"technical\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.catalog_resolved.path, Some(dir.path().join("liquid.json")));
        assert_eq!(config.display.mode, DisplayMode::Technical);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/lens.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lens.toml");
        std::fs::write(&path, "[display]\nmode = \"technical\"\n").unwrap();

        let settings = CliSettings {
            mode: Some(DisplayMode::Friendly),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.display.mode, DisplayMode::Friendly);
    }
}
