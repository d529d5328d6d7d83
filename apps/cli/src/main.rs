//! DocAtlas CLI: maintenance tooling for a Markdown documentation site.
//!
//! Consolidates the corpus into a RAG archive, enforces copyright headers,
//! lints generated HTML links, and applies style fixes.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
