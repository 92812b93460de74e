mod cli;
mod error;
mod export;
mod format;
mod model;
mod timer;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    cli::run(cli::Cli::parse())
}
