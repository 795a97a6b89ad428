//! # CLI Subcommands

use crate::commands::train::TrainArgs;

pub mod train;

/// Subcommands for rawbpe-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Train a byte-level BPE vocabulary from text files.
    Train(TrainArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Train(cmd) => cmd.run(),
        }
    }
}
