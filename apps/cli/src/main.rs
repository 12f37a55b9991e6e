//! thumbfill CLI — article thumbnail backfill tool.
//!
//! Fills in missing article thumbnails from Unsplash image search and
//! rewrites the portfolio site's articles JSON.

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
