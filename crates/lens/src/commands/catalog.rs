//! `lens catalog` command implementation.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use lens_catalog::{DisplayMode, PatternCatalog};
use lens_config::Config;

use super::load_catalog;
use crate::error::CliError;
use crate::output::Output;

/// Catalog subcommands.
#[derive(Subcommand)]
pub(crate) enum CatalogCommand {
    /// Load a catalog and report its entries and any dropped entries.
    Check(CheckArgs),
}

impl CatalogCommand {
    pub(crate) fn verbose(&self) -> bool {
        match self {
            Self::Check(args) => args.verbose,
        }
    }

    /// Execute the catalog subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or has dropped entries.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Check(args) => args.execute(),
        }
    }
}

/// Arguments for the catalog check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Catalog file (default: from config, else the bundled catalog).
    path: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover lens.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let (label, catalog) = match &self.path {
            Some(path) => (path.display().to_string(), PatternCatalog::load(path)?),
            None => {
                let config = Config::load(self.config.as_deref(), None)?;
                let label = config
                    .catalog_resolved
                    .path
                    .as_ref()
                    .map_or_else(|| "bundled catalog".to_owned(), |p| p.display().to_string());
                (label, load_catalog(&config.catalog_resolved)?)
            }
        };

        output.highlight(&format!("Catalog: {label}"));
        for line in summary(&catalog) {
            output.info(&line);
        }

        let warnings = catalog.warnings();
        if warnings.is_empty() {
            output.success("No dropped entries");
            return Ok(());
        }
        for warning in warnings {
            output.warning(&format!("  {warning}"));
        }
        Err(CliError::Validation(format!(
            "{} catalog entries dropped",
            warnings.len()
        )))
    }
}

fn summary(catalog: &PatternCatalog) -> Vec<String> {
    vec![
        format!("  patterns:               {}", catalog.patterns().len()),
        format!("  variables:              {}", catalog.variable_count()),
        format!("  filters:                {}", catalog.filter_count()),
        format!("  operators:              {}", catalog.operators().len()),
        format!("  fallback tag patterns:  {}", catalog.fallback_tag_patterns().len()),
        format!("  output patterns:        {}", catalog.output_patterns().len()),
        format!(
            "  transformations:        {} friendly, {} technical",
            catalog.fallback_transformations(DisplayMode::Friendly).len(),
            catalog.fallback_transformations(DisplayMode::Technical).len()
        ),
    ]
}
