//! Lens CLI - Liquid fragment humanizer.
//!
//! Provides commands for:
//! - `scan`: List the template fragments found in files
//! - `render`: Print files with every fragment rewritten
//! - `catalog check`: Validate a pattern catalog

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CatalogCommand, RenderArgs, ScanArgs};
use output::Output;

/// Lens - Liquid fragment humanizer.
#[derive(Parser)]
#[command(name = "lens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List template fragments with their rewrites.
    Scan(ScanArgs),
    /// Print text with every fragment replaced by its rewrite.
    Render(RenderArgs),
    /// Pattern catalog commands.
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Scan(args) => args.source.verbose,
        Commands::Render(args) => args.source.verbose,
        Commands::Catalog(cmd) => cmd.verbose(),
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Scan(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Catalog(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
