use clap::Parser;

mod cli;
mod commands;
mod error;
mod framing;

use cli::CliArgs;
pub use error::{CliError, CliResult};

fn main() -> CliResult<()> {
    env_logger::init();

    CliArgs::parse().run()
}
