//! CLI command implementations.

pub(crate) mod catalog;
pub(crate) mod render;
pub(crate) mod scan;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use lens_catalog::{DisplayMode, PatternCatalog};
use lens_config::{CatalogConfig, CliSettings, Config};
use lens_engine::LiquidMatcher;

pub(crate) use catalog::CatalogCommand;
pub(crate) use render::RenderArgs;
pub(crate) use scan::ScanArgs;

use crate::error::CliError;

/// Input and matching options shared by `scan` and `render`.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Files to read (default: stdin).
    files: Vec<PathBuf>,

    /// Display mode: friendly or technical (overrides config).
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Pattern catalog file, JSON or YAML (overrides config).
    #[arg(long, env = "LENS_CATALOG")]
    catalog: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover lens.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (catalog timing and dropped entries).
    #[arg(short, long)]
    pub verbose: bool,
}

/// A named text to match.
pub(crate) struct Input {
    pub name: String,
    pub text: String,
}

/// Everything a matching command needs.
pub(crate) struct Session {
    pub config: Config,
    pub matcher: LiquidMatcher,
    pub inputs: Vec<Input>,
}

impl SourceArgs {
    /// Load config and catalog, build the matcher and read the inputs.
    pub(crate) fn open(&self, tooltips: Option<bool>) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            catalog_path: self.catalog.clone(),
            mode: self.mode,
            tooltips,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let catalog = load_catalog(&config.catalog_resolved)?;
        let matcher = LiquidMatcher::new(Arc::new(catalog), config.display.mode);
        let inputs = self.read_inputs()?;

        Ok(Session {
            config,
            matcher,
            inputs,
        })
    }

    fn read_inputs(&self) -> Result<Vec<Input>, CliError> {
        if self.files.is_empty() {
            let text = io::read_to_string(io::stdin())?;
            return Ok(vec![Input {
                name: "<stdin>".to_owned(),
                text,
            }]);
        }

        self.files
            .iter()
            .map(|path| {
                let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                    path: path.clone(),
                    source,
                })?;
                Ok(Input {
                    name: path.display().to_string(),
                    text,
                })
            })
            .collect()
    }
}

/// Load the catalog a resolved configuration points at.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<PatternCatalog, CliError> {
    match &config.path {
        Some(path) => Ok(PatternCatalog::load(path)?),
        None if config.builtin => Ok(PatternCatalog::builtin()),
        None => Ok(PatternCatalog::empty()),
    }
}
