#![deny(missing_docs)]

//! # Manifest Patching
//!
//! Wires source files into the four manifest sections that make them part of
//! a target's build: the owning group's `children` list, the
//! `PBXFileReference` section, the build phase's `files` list, and the
//! `PBXBuildFile` section.
//!
//! The operation is idempotent at whole-run granularity: if any target
//! filename already appears anywhere in the document, nothing is changed.
//! If any of the four sections (or the named group/phase record) is missing,
//! the whole operation fails and the caller's document should be discarded
//! rather than persisted.

use crate::document::{Document, Record};
use crate::error::{AppError, AppResult};
use crate::filetype::last_known_file_type;
use crate::ident::IdGenerator;

/// Section holding one record per file known to the project.
pub const FILE_REFERENCE_SECTION: &str = "PBXFileReference";
/// Section holding one record per file-in-build-phase registration.
pub const BUILD_FILE_SECTION: &str = "PBXBuildFile";
/// Section holding the folder-like group records.
pub const GROUP_SECTION: &str = "PBXGroup";
/// Section holding compile-sources build phases.
pub const SOURCES_PHASE_SECTION: &str = "PBXSourcesBuildPhase";

/// Identifiers assigned to one file during a successful patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredFile {
    /// The filename as registered (also used as the record path).
    pub name: String,
    /// The `lastKnownFileType` classifier derived from the extension.
    pub file_type: &'static str,
    /// Identifier of the new `PBXFileReference` record.
    pub file_ref_id: String,
    /// Identifier of the new `PBXBuildFile` record.
    pub build_file_id: String,
}

/// Result of a patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// A target filename was already present; the document was not touched.
    AlreadyRegistered,
    /// The files were wired into all four sections.
    Registered(Vec<RegisteredFile>),
}

/// Registers `files` under the group named `group` and the build phase named
/// `phase`, mutating `doc` in memory.
///
/// All four insertion targets are validated before the first mutation, so a
/// `MissingSection` error leaves the document unmodified.
pub fn register_sources(
    doc: &mut Document,
    group: &str,
    phase: &str,
    files: &[String],
) -> AppResult<PatchOutcome> {
    if files.is_empty() {
        return Err(AppError::General("No files to register".into()));
    }

    // Idempotence marker check: any filename already present skips the run.
    if files.iter().any(|name| doc.contains(name)) {
        return Ok(PatchOutcome::AlreadyRegistered);
    }

    ensure_targets_exist(doc, group, phase)?;

    let mut ids = IdGenerator::new(doc.identifiers());
    let entries: Vec<RegisteredFile> = files
        .iter()
        .map(|name| RegisteredFile {
            name: name.clone(),
            file_type: last_known_file_type(name),
            file_ref_id: ids.next_id(),
            build_file_id: ids.next_id(),
        })
        .collect();

    // 1. Group children
    let group_rec = doc
        .section_mut(GROUP_SECTION)
        .and_then(|s| s.record_by_comment_mut(group))
        .ok_or_else(|| missing_group(group))?;
    for entry in &entries {
        group_rec.append_list_entry("children", &entry.file_ref_id, &entry.name)?;
    }

    // 2. File reference records
    let refs = doc
        .section_mut(FILE_REFERENCE_SECTION)
        .ok_or_else(|| AppError::MissingSection(FILE_REFERENCE_SECTION.into()))?;
    for (i, entry) in entries.iter().enumerate() {
        let line = format!(
            "\t\t{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = {}; path = {}; sourceTree = \"<group>\"; }};",
            entry.file_ref_id,
            entry.name,
            entry.file_type,
            field_value(&entry.name),
        );
        refs.insert_record(i, Record::from_line(&line)?);
    }

    // 3. Build phase files
    let phase_rec = doc
        .section_mut(SOURCES_PHASE_SECTION)
        .and_then(|s| s.record_by_comment_mut(phase))
        .ok_or_else(|| missing_phase(phase))?;
    for entry in &entries {
        let comment = format!("{} in {}", entry.name, phase);
        phase_rec.append_list_entry("files", &entry.build_file_id, &comment)?;
    }

    // 4. Build file records
    let build_files = doc
        .section_mut(BUILD_FILE_SECTION)
        .ok_or_else(|| AppError::MissingSection(BUILD_FILE_SECTION.into()))?;
    for (i, entry) in entries.iter().enumerate() {
        let line = format!(
            "\t\t{} /* {} in {} */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; }};",
            entry.build_file_id, entry.name, phase, entry.file_ref_id, entry.name,
        );
        build_files.insert_record(i, Record::from_line(&line)?);
    }

    Ok(PatchOutcome::Registered(entries))
}

/// Validates every insertion target up front so a failed run never leaves a
/// half-patched document behind.
fn ensure_targets_exist(doc: &Document, group: &str, phase: &str) -> AppResult<()> {
    if doc
        .section(GROUP_SECTION)
        .and_then(|s| s.record_by_comment(group))
        .is_none()
    {
        return Err(missing_group(group));
    }
    if doc
        .section(SOURCES_PHASE_SECTION)
        .and_then(|s| s.record_by_comment(phase))
        .is_none()
    {
        return Err(missing_phase(phase));
    }
    if doc.section(FILE_REFERENCE_SECTION).is_none() {
        return Err(AppError::MissingSection(FILE_REFERENCE_SECTION.into()));
    }
    if doc.section(BUILD_FILE_SECTION).is_none() {
        return Err(AppError::MissingSection(BUILD_FILE_SECTION.into()));
    }
    Ok(())
}

fn missing_group(group: &str) -> AppError {
    AppError::MissingSection(format!("group '{}' in {}", group, GROUP_SECTION))
}

fn missing_phase(phase: &str) -> AppError {
    AppError::MissingSection(format!("build phase '{}' in {}", phase, SOURCES_PHASE_SECTION))
}

/// Quotes a field value the way Xcode does when it contains characters
/// outside the bare-word set.
fn field_value(s: &str) -> String {
    let bare = !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'/' | b'+' | b'-'));
    if bare {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SAMPLE_MANIFEST;
    use crate::ident::is_manifest_id;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn widget_files() -> Vec<String> {
        vec![
            "WidgetBridge.m".to_string(),
            "WidgetBridge.swift".to_string(),
            "WidgetDataManager.swift".to_string(),
        ]
    }

    fn patch_sample() -> (Document, Vec<RegisteredFile>) {
        let mut doc = Document::parse(SAMPLE_MANIFEST).unwrap();
        let outcome = register_sources(&mut doc, "Brigo", "Sources", &widget_files()).unwrap();
        match outcome {
            PatchOutcome::Registered(entries) => (doc, entries),
            PatchOutcome::AlreadyRegistered => panic!("fresh manifest reported as registered"),
        }
    }

    #[test]
    fn test_fresh_patch_adds_three_records_per_section() {
        let before = Document::parse(SAMPLE_MANIFEST).unwrap();
        let (after, entries) = patch_sample();
        assert_eq!(entries.len(), 3);

        for kind in [FILE_REFERENCE_SECTION, BUILD_FILE_SECTION] {
            let count_before = before.section(kind).unwrap().records().count();
            let count_after = after.section(kind).unwrap().records().count();
            assert_eq!(count_after, count_before + 3, "section {}", kind);
        }
    }

    #[test]
    fn test_fresh_patch_ids_are_distinct_and_well_formed() {
        let (_, entries) = patch_sample();
        let mut all = HashSet::new();
        for entry in &entries {
            assert!(is_manifest_id(&entry.file_ref_id));
            assert!(is_manifest_id(&entry.build_file_id));
            assert!(all.insert(entry.file_ref_id.clone()));
            assert!(all.insert(entry.build_file_id.clone()));
        }
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_generated_ids_avoid_existing_document_ids() {
        let existing = Document::parse(SAMPLE_MANIFEST).unwrap().identifiers();
        let (_, entries) = patch_sample();
        for entry in &entries {
            assert!(!existing.contains(&entry.file_ref_id));
            assert!(!existing.contains(&entry.build_file_id));
        }
    }

    #[test]
    fn test_build_entries_resolve_to_file_references() {
        let (doc, entries) = patch_sample();
        let build_files = doc.section(BUILD_FILE_SECTION).unwrap();
        for entry in &entries {
            let comment = format!("{} in Sources", entry.name);
            let rec = build_files.record_by_comment(&comment).unwrap();
            assert_eq!(rec.id(), entry.build_file_id);
            assert!(rec.lines()[0].contains(&entry.file_ref_id));
        }
    }

    #[test]
    fn test_group_and_phase_lists_gain_entries() {
        let (doc, entries) = patch_sample();
        let out = doc.serialize();
        for entry in &entries {
            assert!(out.contains(&format!("{} /* {} */,", entry.file_ref_id, entry.name)));
            assert!(out.contains(&format!("{} /* {} in Sources */,", entry.build_file_id, entry.name)));
        }
    }

    #[test]
    fn test_file_types_follow_extension() {
        let (_, entries) = patch_sample();
        assert_eq!(entries[0].file_type, "sourcecode.c.objc");
        assert_eq!(entries[1].file_type, "sourcecode.swift");
        assert_eq!(entries[2].file_type, "sourcecode.swift");
    }

    #[test]
    fn test_marker_check_trips_after_patch() {
        let (doc, _) = patch_sample();
        for name in widget_files() {
            assert!(doc.contains(&name));
        }
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let (mut doc, _) = patch_sample();
        let first = doc.serialize();
        let outcome = register_sources(&mut doc, "Brigo", "Sources", &widget_files()).unwrap();
        assert_eq!(outcome, PatchOutcome::AlreadyRegistered);
        assert_eq!(doc.serialize(), first);
    }

    #[test]
    fn test_partial_presence_skips_whole_run() {
        // One of the three filenames already present is enough to skip
        let mut doc = Document::parse(SAMPLE_MANIFEST).unwrap();
        let files = vec!["AppDelegate.m".to_string(), "WidgetBridge.m".to_string()];
        let outcome = register_sources(&mut doc, "Brigo", "Sources", &files).unwrap();
        assert_eq!(outcome, PatchOutcome::AlreadyRegistered);
        assert_eq!(doc.serialize(), SAMPLE_MANIFEST);
    }

    #[test]
    fn test_missing_group_fails_without_mutation() {
        let mut doc = Document::parse(SAMPLE_MANIFEST).unwrap();
        let res = register_sources(&mut doc, "NoSuchGroup", "Sources", &widget_files());
        assert!(matches!(res, Err(AppError::MissingSection(_))));
        assert_eq!(doc.serialize(), SAMPLE_MANIFEST);
    }

    #[test]
    fn test_missing_phase_fails_without_mutation() {
        let mut doc = Document::parse(SAMPLE_MANIFEST).unwrap();
        let res = register_sources(&mut doc, "Brigo", "Resources", &widget_files());
        assert!(matches!(res, Err(AppError::MissingSection(_))));
        assert_eq!(doc.serialize(), SAMPLE_MANIFEST);
    }

    #[test]
    fn test_missing_build_file_section_fails() {
        // A manifest with a group and phase but no PBXBuildFile section
        let text = SAMPLE_MANIFEST
            .lines()
            .filter(|l| !l.contains("PBXBuildFile section") && !l.contains("isa = PBXBuildFile"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut doc = Document::parse(&text).unwrap();
        let res = register_sources(&mut doc, "Brigo", "Sources", &widget_files());
        assert!(matches!(res, Err(AppError::MissingSection(_))));
    }

    #[test]
    fn test_no_files_is_an_error() {
        let mut doc = Document::parse(SAMPLE_MANIFEST).unwrap();
        let res = register_sources(&mut doc, "Brigo", "Sources", &[]);
        assert!(matches!(res, Err(AppError::General(_))));
    }

    #[test]
    fn test_patched_document_still_round_trips() {
        let (doc, _) = patch_sample();
        let out = doc.serialize();
        let reparsed = Document::parse(&out).unwrap();
        assert_eq!(reparsed.serialize(), out);
    }

    #[test]
    fn test_field_value_quoting() {
        assert_eq!(field_value("WidgetBridge.m"), "WidgetBridge.m");
        assert_eq!(field_value("My File.swift"), "\"My File.swift\"");
        assert_eq!(field_value(""), "\"\"");
    }
}
