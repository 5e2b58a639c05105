//! Command-line interface for repo-to-md
//!
//! `repo-to-md <ROOT> <OUTPUT>` appends every included file under ROOT to the
//! Markdown document at OUTPUT.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod export;

pub use export::ExportArgs;

/// Concatenate a repository's text files into one Markdown document
#[derive(Parser)]
#[command(name = "repo-to-md")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    export: ExportArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    export::run(cli.export)
}
