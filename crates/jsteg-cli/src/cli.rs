use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Reveal(reveal::RevealArgs),
    Capacity(capacity::CapacityArgs),
}

impl CliArgs {
    pub fn run(self) -> crate::CliResult<()> {
        match self.command {
            Commands::Hide(args) => args.run(),
            Commands::Reveal(args) => args.run(),
            Commands::Capacity(args) => args.run(),
        }
    }
}
