#![deny(missing_docs)]

//! # xcadd CLI
//!
//! Command Line Interface for registering source files in an Xcode project
//! manifest (`project.pbxproj`).
//!
//! Supported Commands:
//! - `add`: Wires files into a group and a compile-sources build phase.
//! - `check`: Reports whether files are already registered.

use crate::error::CliResult;
use clap::{Parser, Subcommand};

mod add;
mod check;
mod error;
#[cfg(test)]
mod fixture;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Registers source files in Xcode project manifests")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wire source files into a group and a compile-sources build phase.
    Add(add::AddArgs),
    /// Report whether files are already registered in the manifest.
    Check(check::CheckArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Add(args) => add::execute(args),
        Commands::Check(args) => check::execute(args),
    }
}
