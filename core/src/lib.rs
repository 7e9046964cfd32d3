#![deny(missing_docs)]

//! # xcadd Core
//!
//! Core library for registering source files in Xcode project manifests
//! (`project.pbxproj`). Models the manifest as typed sections and records,
//! performs insertions on the in-memory model, and re-serializes it
//! deterministically.

/// Shared error types.
pub mod error;

/// Manifest document model (sections, records, serialization).
pub mod document;

/// Manifest identifier generation.
pub mod ident;

/// Filename extension to `lastKnownFileType` mapping.
pub mod filetype;

/// The source-file registration patch.
pub mod patcher;

pub use document::{Document, Record, Section};
pub use error::{AppError, AppResult};
pub use filetype::last_known_file_type;
pub use ident::{is_manifest_id, IdGenerator};
pub use patcher::{
    register_sources, PatchOutcome, RegisteredFile, BUILD_FILE_SECTION, FILE_REFERENCE_SECTION,
    GROUP_SECTION, SOURCES_PHASE_SECTION,
};
