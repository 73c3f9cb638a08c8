//! Showtime CLI: schema-driven movie showtime scraper.
//!
//! Walks configured theater pages with declarative layout schemas and writes
//! one JSON document grouping every listing by date and title.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
