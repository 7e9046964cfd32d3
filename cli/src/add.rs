#![deny(missing_docs)]

//! # Add Command
//!
//! Loads the manifest, wires the given files into the target group and build
//! phase, and overwrites the manifest in place with a single full write.
//!
//! The command is idempotent: if any filename is already present in the
//! manifest, the run reports that and leaves the file untouched. If any of
//! the four insertion targets is missing, the run fails with a diagnostic
//! and nothing is written.

use crate::error::{CliError, CliResult};
use std::fs;
use std::path::PathBuf;
use xcadd_core::{register_sources, Document, PatchOutcome};

/// Arguments for the add command.
#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    /// Path to the project manifest (e.g. ios/App.xcodeproj/project.pbxproj).
    #[clap(long)]
    pub project: PathBuf,

    /// Display name of the group that receives the files.
    #[clap(long)]
    pub group: String,

    /// Display name of the build phase that compiles the files.
    #[clap(long, default_value = "Sources")]
    pub phase: String,

    /// Patch in memory and report, without writing the manifest.
    #[clap(long)]
    pub dry_run: bool,

    /// Filenames to register.
    #[clap(required = true)]
    pub files: Vec<String>,
}

/// Executes the add command.
pub fn execute(args: &AddArgs) -> CliResult<()> {
    let text = fs::read_to_string(&args.project).map_err(|e| {
        CliError::General(format!("Failed to read manifest {:?}: {}", args.project, e))
    })?;

    let mut doc = Document::parse(&text)?;

    match register_sources(&mut doc, &args.group, &args.phase, &args.files)? {
        PatchOutcome::AlreadyRegistered => {
            println!(
                "Files already registered in {:?}; nothing to do.",
                args.project
            );
        }
        PatchOutcome::Registered(entries) => {
            if args.dry_run {
                println!("Dry run; {:?} left untouched.", args.project);
            } else {
                fs::write(&args.project, doc.serialize()).map_err(|e| {
                    CliError::General(format!(
                        "Failed to write manifest {:?}: {}",
                        args.project, e
                    ))
                })?;
            }
            for entry in &entries {
                println!("Registered {} ({})", entry.name, entry.file_type);
            }
            println!(
                "Added {} file(s) to group '{}' and the '{}' build phase.",
                entries.len(),
                args.group,
                args.phase
            );
        }
    }

    Ok(())
}
