//! # File Type Classification
//!
//! Maps filename extensions to the `lastKnownFileType` classifier stored on
//! `PBXFileReference` records.

/// Returns the manifest file-type classifier for a filename.
pub fn last_known_file_type(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "swift" => "sourcecode.swift",
        "m" => "sourcecode.c.objc",
        "mm" => "sourcecode.cpp.objcpp",
        "h" => "sourcecode.c.h",
        "c" => "sourcecode.c.c",
        "cpp" | "cc" | "cxx" => "sourcecode.cpp.cpp",
        "metal" => "sourcecode.metal",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "plist" => "text.plist.xml",
        "json" => "text.json",
        _ => "text",
    }
}
