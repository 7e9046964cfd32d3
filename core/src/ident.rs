//! # Identifier Generation
//!
//! Produces the 24-character uppercase hexadecimal tokens Xcode uses to key
//! manifest records. Tokens are derived from random 128-bit values and
//! checked against every identifier already present in the document, so a
//! collision (however unlikely) triggers regeneration instead of a corrupt
//! manifest.

use std::collections::HashSet;
use uuid::Uuid;

/// Length of a manifest record identifier.
pub const ID_LEN: usize = 24;

/// Generates fresh manifest identifiers, tracking every identifier it has
/// seen or issued to guarantee uniqueness within a run.
#[derive(Debug)]
pub struct IdGenerator {
    taken: HashSet<String>,
}

impl IdGenerator {
    /// Creates a generator seeded with the identifiers already present in
    /// the document being patched.
    pub fn new(taken: HashSet<String>) -> Self {
        Self { taken }
    }

    /// Issues a fresh identifier, regenerating on collision with any known
    /// identifier.
    pub fn next_id(&mut self) -> String {
        loop {
            let mut candidate = Uuid::new_v4().simple().to_string().to_uppercase();
            candidate.truncate(ID_LEN);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Tests whether a string has the shape of a manifest identifier.
pub fn is_manifest_id(s: &str) -> bool {
    s.len() == ID_LEN && s.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let mut generator = IdGenerator::new(HashSet::new());
        let id = generator.next_id();
        assert!(is_manifest_id(&id), "bad id shape: {}", id);
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut generator = IdGenerator::new(HashSet::new());
        let mut seen = HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(generator.next_id()));
        }
    }

    #[test]
    fn test_seeded_ids_are_never_reissued() {
        let mut taken = HashSet::new();
        taken.insert("13B07FB01A68108700A75B9A".to_string());
        let mut generator = IdGenerator::new(taken.clone());
        for _ in 0..100 {
            assert!(!taken.contains(&generator.next_id()));
        }
    }

    #[test]
    fn test_is_manifest_id() {
        assert!(is_manifest_id("13B07FB01A68108700A75B9A"));
        assert!(!is_manifest_id("13b07fb01a68108700a75b9a")); // lowercase
        assert!(!is_manifest_id("13B07FB01A68108700A75B9")); // too short
        assert!(!is_manifest_id("13B07FB01A68108700A75B9G")); // non-hex
    }
}
