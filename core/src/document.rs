#![deny(missing_docs)]

//! # Manifest Document Model
//!
//! Models an Xcode `project.pbxproj` manifest as an ordered sequence of
//! verbatim text runs and typed sections, where each section is delimited by
//! `/* Begin <Kind> section */` and `/* End <Kind> section */` markers and
//! holds an ordered list of records.
//!
//! The model is deliberately line-structured rather than a full plist
//! grammar: records are captured verbatim and bounded by a depth-counting
//! brace scanner, so an unmodified parse → serialize round trip reproduces
//! the input byte for byte. Record blocks are closed at the *nearest*
//! matching brace, which keeps nested bracketed lists (build settings,
//! shell-script phases) from being swallowed into the wrong record.

use crate::error::{AppError, AppResult};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static BEGIN_RE: OnceLock<Regex> = OnceLock::new();
static END_RE: OnceLock<Regex> = OnceLock::new();
static RECORD_OPEN_RE: OnceLock<Regex> = OnceLock::new();
static ID_RE: OnceLock<Regex> = OnceLock::new();

fn begin_re() -> &'static Regex {
    BEGIN_RE.get_or_init(|| Regex::new(r"^/\* Begin (\w+) section \*/$").unwrap())
}

fn end_re() -> &'static Regex {
    END_RE.get_or_init(|| Regex::new(r"^/\* End (\w+) section \*/$").unwrap())
}

fn record_open_re() -> &'static Regex {
    RECORD_OPEN_RE
        .get_or_init(|| Regex::new(r"^\s*([0-9A-F]{24})(?: /\* (.+?) \*/)? = \{").unwrap())
}

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"\b[0-9A-F]{24}\b").unwrap())
}

/// A single named record inside a section.
///
/// Holds its identifier, optional display comment, and the verbatim lines of
/// the record block (opening line through closing `};`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: String,
    comment: Option<String>,
    lines: Vec<String>,
}

impl Record {
    /// Builds a record from a pre-formatted single-line entry
    /// (e.g. a `PBXFileReference` or `PBXBuildFile` line).
    ///
    /// Fails if the line does not carry the `<id> /* comment */ = {` shape.
    pub fn from_line(line: &str) -> AppResult<Self> {
        let caps = record_open_re().captures(line).ok_or_else(|| {
            AppError::Parse(format!("Not a record line: '{}'", line.trim()))
        })?;
        Ok(Self {
            id: caps[1].to_string(),
            comment: caps.get(2).map(|m| m.as_str().to_string()),
            lines: vec![line.to_string()],
        })
    }

    /// The record's 24-character hexadecimal identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display comment, if present (e.g. `Brigo` or `Sources`).
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The verbatim lines of the record block.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Appends an `<id> /* comment */,` entry at the end of a named
    /// parenthesized list field (e.g. `children` or `files`), preserving the
    /// indentation of existing entries.
    pub fn append_list_entry(&mut self, list: &str, id: &str, comment: &str) -> AppResult<()> {
        let open_marker = format!("{} = (", list);
        let open_idx = self
            .lines
            .iter()
            .position(|l| l.trim() == open_marker)
            .ok_or_else(|| {
                AppError::Parse(format!(
                    "Record '{}' has no '{}' list",
                    self.display_name(),
                    list
                ))
            })?;

        let close_idx = self.lines[open_idx + 1..]
            .iter()
            .position(|l| l.trim() == ");")
            .map(|off| open_idx + 1 + off)
            .ok_or_else(|| {
                AppError::Parse(format!(
                    "'{}' list in record '{}' is not terminated",
                    list,
                    self.display_name()
                ))
            })?;

        let indent = if close_idx > open_idx + 1 {
            leading_whitespace(&self.lines[close_idx - 1]).to_string()
        } else {
            format!("{}\t", leading_whitespace(&self.lines[open_idx]))
        };

        self.lines
            .insert(close_idx, format!("{}{} /* {} */,", indent, id, comment));
        Ok(())
    }

    fn display_name(&self) -> &str {
        self.comment.as_deref().unwrap_or(&self.id)
    }
}

/// One item inside a section: a parsed record, or a verbatim line that is
/// not part of any record (blank separators and the like).
#[derive(Debug, Clone, PartialEq, Eq)]
enum SectionItem {
    Record(Record),
    Raw(String),
}

/// A typed manifest section (`PBXFileReference`, `PBXGroup`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    kind: String,
    begin: String,
    end: String,
    items: Vec<SectionItem>,
}

impl Section {
    /// The section kind tag taken from the begin marker.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Iterates over the section's records in source order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter_map(|item| match item {
            SectionItem::Record(rec) => Some(rec),
            SectionItem::Raw(_) => None,
        })
    }

    /// Finds a record by its display comment.
    pub fn record_by_comment(&self, comment: &str) -> Option<&Record> {
        self.records().find(|rec| rec.comment() == Some(comment))
    }

    /// Mutable variant of [`Section::record_by_comment`].
    pub fn record_by_comment_mut(&mut self, comment: &str) -> Option<&mut Record> {
        self.items.iter_mut().find_map(|item| match item {
            SectionItem::Record(rec) if rec.comment() == Some(comment) => Some(rec),
            _ => None,
        })
    }

    /// Inserts a record at the given position (0 = directly after the begin
    /// marker). Positions past the end append.
    pub fn insert_record(&mut self, index: usize, record: Record) {
        let index = index.min(self.items.len());
        self.items.insert(index, SectionItem::Record(record));
    }
}

/// A chunk of the document: either verbatim lines outside any section, or a
/// typed section.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk {
    Raw(Vec<String>),
    Section(Section),
}

/// An in-memory Xcode project manifest.
///
/// Owns the full document for the duration of a patch run; see the module
/// docs for the modeling strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    chunks: Vec<Chunk>,
}

impl Document {
    /// Parses manifest text into the chunk/section/record model.
    ///
    /// Unterminated sections or record blocks are parse errors; text between
    /// records and outside sections is preserved verbatim.
    pub fn parse(text: &str) -> AppResult<Self> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut chunks = Vec::new();
        let mut raw: Vec<String> = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            if let Some(caps) = begin_re().captures(line) {
                if !raw.is_empty() {
                    chunks.push(Chunk::Raw(std::mem::take(&mut raw)));
                }
                let kind = caps[1].to_string();
                let (section, next) = Self::parse_section(&lines, i, kind)?;
                chunks.push(Chunk::Section(section));
                i = next;
            } else {
                raw.push(line.to_string());
                i += 1;
            }
        }

        if !raw.is_empty() {
            chunks.push(Chunk::Raw(raw));
        }

        Ok(Self { chunks })
    }

    /// Parses one section starting at the begin marker; returns the section
    /// and the index of the first line after the end marker.
    fn parse_section(lines: &[&str], start: usize, kind: String) -> AppResult<(Section, usize)> {
        let begin = lines[start].to_string();
        let mut items = Vec::new();
        let mut i = start + 1;

        loop {
            let line = *lines.get(i).ok_or_else(|| {
                AppError::Parse(format!("Section '{}' is not terminated", kind))
            })?;

            if let Some(caps) = end_re().captures(line) {
                if caps[1] != kind {
                    return Err(AppError::Parse(format!(
                        "Section '{}' closed by mismatched marker '{}'",
                        kind, &caps[1]
                    )));
                }
                let section = Section {
                    kind,
                    begin,
                    end: line.to_string(),
                    items,
                };
                return Ok((section, i + 1));
            }

            if begin_re().is_match(line) {
                return Err(AppError::Parse(format!(
                    "Section '{}' is not terminated",
                    kind
                )));
            }

            if let Some(caps) = record_open_re().captures(line) {
                let id = caps[1].to_string();
                let comment = caps.get(2).map(|m| m.as_str().to_string());
                let mut rec_lines = vec![line.to_string()];
                let mut depth = brace_delta(line);
                i += 1;
                while depth > 0 {
                    let rec_line = *lines.get(i).ok_or_else(|| {
                        AppError::Parse(format!("Record '{}' is not terminated", id))
                    })?;
                    rec_lines.push(rec_line.to_string());
                    depth += brace_delta(rec_line);
                    i += 1;
                }
                items.push(SectionItem::Record(Record {
                    id,
                    comment,
                    lines: rec_lines,
                }));
            } else {
                items.push(SectionItem::Raw(line.to_string()));
                i += 1;
            }
        }
    }

    /// Re-emits the manifest text. An unmodified document serializes to the
    /// exact input it was parsed from.
    pub fn serialize(&self) -> String {
        let mut out: Vec<&str> = Vec::new();
        for chunk in &self.chunks {
            match chunk {
                Chunk::Raw(lines) => out.extend(lines.iter().map(String::as_str)),
                Chunk::Section(section) => {
                    out.push(&section.begin);
                    for item in &section.items {
                        match item {
                            SectionItem::Record(rec) => {
                                out.extend(rec.lines.iter().map(String::as_str));
                            }
                            SectionItem::Raw(line) => out.push(line),
                        }
                    }
                    out.push(&section.end);
                }
            }
        }
        out.join("\n")
    }

    /// Substring test over the whole document (the idempotence marker check).
    pub fn contains(&self, needle: &str) -> bool {
        self.chunks.iter().any(|chunk| match chunk {
            Chunk::Raw(lines) => lines.iter().any(|l| l.contains(needle)),
            Chunk::Section(section) => section.items.iter().any(|item| match item {
                SectionItem::Record(rec) => rec.lines.iter().any(|l| l.contains(needle)),
                SectionItem::Raw(line) => line.contains(needle),
            }),
        })
    }

    /// Collects every 24-character hexadecimal identifier appearing anywhere
    /// in the document, including cross-references inside record bodies.
    pub fn identifiers(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        let mut scan = |line: &str| {
            for m in id_re().find_iter(line) {
                ids.insert(m.as_str().to_string());
            }
        };
        for chunk in &self.chunks {
            match chunk {
                Chunk::Raw(lines) => lines.iter().for_each(|l| scan(l)),
                Chunk::Section(section) => {
                    for item in &section.items {
                        match item {
                            SectionItem::Record(rec) => rec.lines.iter().for_each(|l| scan(l)),
                            SectionItem::Raw(line) => scan(line),
                        }
                    }
                }
            }
        }
        ids
    }

    /// Looks up a section by kind.
    pub fn section(&self, kind: &str) -> Option<&Section> {
        self.chunks.iter().find_map(|chunk| match chunk {
            Chunk::Section(section) if section.kind == kind => Some(section),
            _ => None,
        })
    }

    /// Mutable variant of [`Document::section`].
    pub fn section_mut(&mut self, kind: &str) -> Option<&mut Section> {
        self.chunks.iter_mut().find_map(|chunk| match chunk {
            Chunk::Section(section) if section.kind == kind => Some(section),
            _ => None,
        })
    }
}

/// Net brace depth change over one line, ignoring braces inside
/// double-quoted strings and `/* */` comments (shell-script phases routinely
/// embed both).
fn brace_delta(line: &str) -> i32 {
    let bytes = line.as_bytes();
    let mut depth = 0;
    let mut in_string = false;
    let mut in_comment = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
        } else if in_comment {
            if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                in_comment = false;
                i += 1;
            }
        } else {
            match b {
                b'"' => in_string = true,
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    in_comment = true;
                    i += 1;
                }
                b'{' => depth += 1,
                b'}' => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }
    depth
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// A realistic manifest excerpt shared by the core test modules.
#[cfg(test)]
pub(crate) const SAMPLE_MANIFEST: &str = "// !$*UTF8*$!
{
\tarchiveVersion = 1;
\tclasses = {
\t};
\tobjectVersion = 46;
\tobjects = {

/* Begin PBXBuildFile section */
\t\t13B07FBC1A68108700A75B9A /* AppDelegate.m in Sources */ = {isa = PBXBuildFile; fileRef = 13B07FB01A68108700A75B9A /* AppDelegate.m */; };
\t\t13B07FC11A68108700A75B9A /* main.m in Sources */ = {isa = PBXBuildFile; fileRef = 13B07FB71A68108700A75B9A /* main.m */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
\t\t13B07FB01A68108700A75B9A /* AppDelegate.m */ = {isa = PBXFileReference; fileEncoding = 4; lastKnownFileType = sourcecode.c.objc; name = AppDelegate.m; path = Brigo/AppDelegate.m; sourceTree = \"<group>\"; };
\t\t13B07FB71A68108700A75B9A /* main.m */ = {isa = PBXFileReference; fileEncoding = 4; lastKnownFileType = sourcecode.c.objc; name = main.m; path = Brigo/main.m; sourceTree = \"<group>\"; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
\t\t13B07FAE1A68108700A75B9A /* Brigo */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\t13B07FB01A68108700A75B9A /* AppDelegate.m */,
\t\t\t\t13B07FB71A68108700A75B9A /* main.m */,
\t\t\t);
\t\t\tname = Brigo;
\t\t\tsourceTree = \"<group>\";
\t\t};
\t\t83CBB9F61A601CBA00E9B192 = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\t13B07FAE1A68108700A75B9A /* Brigo */,
\t\t\t);
\t\t\tindentWidth = 2;
\t\t\tsourceTree = \"<group>\";
\t\t};
/* End PBXGroup section */

/* Begin PBXShellScriptBuildPhase section */
\t\t00DD1BFF1BD5951E006B06BC /* Bundle React Native code and images */ = {
\t\t\tisa = PBXShellScriptBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t);
\t\t\tname = \"Bundle React Native code and images\";
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t\tshellPath = /bin/sh;
\t\t\tshellScript = \"set -e\\nexport NODE_BINARY=node\\nif [ \\\"${CONFIGURATION}\\\" = \\\"Release\\\" ]; then echo done; fi\\n\";
\t\t};
/* End PBXShellScriptBuildPhase section */

/* Begin PBXSourcesBuildPhase section */
\t\t13B07F871A680F5B00A75B9A /* Sources */ = {
\t\t\tisa = PBXSourcesBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t\t13B07FBC1A68108700A75B9A /* AppDelegate.m in Sources */,
\t\t\t\t13B07FC11A68108700A75B9A /* main.m in Sources */,
\t\t\t);
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t};
/* End PBXSourcesBuildPhase section */
\t};
\trootObject = 83CBB9F71A601CBA00E9B192 /* Project object */;
}
";
