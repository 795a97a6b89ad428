//! # `rawbpe-cli`
//!
//! Command-line interface for training byte-level BPE vocabularies.

mod commands;
mod logging;

use clap::Parser;
use commands::Commands;

pub use logging::LogArgs;

/// rawbpe-cli
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
