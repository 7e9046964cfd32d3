#![deny(missing_docs)]

//! # Check Command
//!
//! Runs the registration marker check as a user-visible query: reports which
//! of the given filenames already appear in the manifest. Exits successfully
//! only when every file is present.

use crate::error::{CliError, CliResult};
use std::fs;
use std::path::PathBuf;
use xcadd_core::Document;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the project manifest.
    #[clap(long)]
    pub project: PathBuf,

    /// Filenames to look for.
    #[clap(required = true)]
    pub files: Vec<String>,
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    let text = fs::read_to_string(&args.project).map_err(|e| {
        CliError::General(format!("Failed to read manifest {:?}: {}", args.project, e))
    })?;

    let doc = Document::parse(&text)?;

    let mut missing = 0;
    for name in &args.files {
        if doc.contains(name) {
            println!("{}: registered", name);
        } else {
            println!("{}: not registered", name);
            missing += 1;
        }
    }

    if missing > 0 {
        return Err(CliError::General(format!(
            "{} of {} file(s) not registered",
            missing,
            args.files.len()
        )));
    }
    Ok(())
}
