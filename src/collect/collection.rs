// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Append-only hash aggregation store
//!
//! Collects (algorithm, digest) entries per directive as modules are
//! scanned. Grows monotonically during a build; never shrinks. Inserts are
//! idempotent and commutative, so the overlapped, out-of-order hook
//! invocations of the host pipeline all converge on the same final state.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;

/// Directive a hash entry is collected under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashDirective {
    /// script-src
    ScriptSrc,
    /// script-src-elem
    ScriptSrcElem,
    /// script-src-attr
    ScriptSrcAttr,
    /// style-src
    StyleSrc,
    /// style-src-elem
    StyleSrcElem,
    /// style-src-attr
    StyleSrcAttr,
}

impl HashDirective {
    /// Directive name as it appears in a policy string
    pub fn as_str(&self) -> &'static str {
        match self {
            HashDirective::ScriptSrc => "script-src",
            HashDirective::ScriptSrcElem => "script-src-elem",
            HashDirective::ScriptSrcAttr => "script-src-attr",
            HashDirective::StyleSrc => "style-src",
            HashDirective::StyleSrcElem => "style-src-elem",
            HashDirective::StyleSrcAttr => "style-src-attr",
        }
    }

    /// All directives hashes can be collected under, in policy order
    pub fn all() -> [HashDirective; 6] {
        [
            HashDirective::ScriptSrc,
            HashDirective::ScriptSrcElem,
            HashDirective::ScriptSrcAttr,
            HashDirective::StyleSrc,
            HashDirective::StyleSrcElem,
            HashDirective::StyleSrcAttr,
        ]
    }
}

impl std::fmt::Display for HashDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single collected digest
///
/// Immutable once created; identified by (directive, algorithm, digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    /// Algorithm the digest was produced with
    pub algorithm: HashAlgorithm,
    /// Base64 digest of the content
    pub digest: String,
}

impl HashEntry {
    /// Create a new entry
    pub fn new(algorithm: HashAlgorithm, digest: impl Into<String>) -> Self {
        Self {
            algorithm,
            digest: digest.into(),
        }
    }

    /// Render as a quoted CSP source token
    pub fn csp_token(&self) -> String {
        crate::digest::csp_token(self.algorithm, &self.digest)
    }
}

/// Append-only store of collected hashes, keyed by directive
///
/// Entry order per directive is insertion order, so the tokens rendered
/// into the final policy are stable across identical builds.
#[derive(Debug, Default)]
pub struct HashCollection {
    entries: RwLock<HashMap<HashDirective, Vec<HashEntry>>>,
}

impl HashCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a duplicate digest for the same directive is a no-op
    pub fn add(&self, directive: HashDirective, entry: HashEntry) {
        let mut entries = self.entries.write();
        let bucket = entries.entry(directive).or_default();
        if !bucket.contains(&entry) {
            tracing::debug!(
                directive = %directive,
                algorithm = %entry.algorithm,
                "collected hash"
            );
            bucket.push(entry);
        }
    }

    /// Entries collected for a directive, in insertion order
    pub fn entries_for(&self, directive: HashDirective) -> Vec<HashEntry> {
        self.entries
            .read()
            .get(&directive)
            .cloned()
            .unwrap_or_default()
    }

    /// Check whether anything was collected for a directive
    pub fn has_entries(&self, directive: HashDirective) -> bool {
        self.entries
            .read()
            .get(&directive)
            .map(|b| !b.is_empty())
            .unwrap_or(false)
    }

    /// Total number of collected entries
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    /// Check whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{digest, HashAlgorithm};

    #[test]
    fn test_add_is_idempotent() {
        let collection = HashCollection::new();
        let entry = HashEntry::new(HashAlgorithm::Sha256, digest("alert(1)", HashAlgorithm::Sha256));

        collection.add(HashDirective::ScriptSrcElem, entry.clone());
        collection.add(HashDirective::ScriptSrcElem, entry);

        assert_eq!(collection.entries_for(HashDirective::ScriptSrcElem).len(), 1);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let collection = HashCollection::new();
        collection.add(
            HashDirective::StyleSrcElem,
            HashEntry::new(HashAlgorithm::Sha256, "first"),
        );
        collection.add(
            HashDirective::StyleSrcElem,
            HashEntry::new(HashAlgorithm::Sha256, "second"),
        );

        let entries = collection.entries_for(HashDirective::StyleSrcElem);
        assert_eq!(entries[0].digest, "first");
        assert_eq!(entries[1].digest, "second");
    }

    #[test]
    fn test_same_digest_different_directives() {
        let collection = HashCollection::new();
        let entry = HashEntry::new(HashAlgorithm::Sha256, "shared");

        collection.add(HashDirective::ScriptSrcElem, entry.clone());
        collection.add(HashDirective::StyleSrcElem, entry);

        assert_eq!(collection.len(), 2);
        assert!(collection.has_entries(HashDirective::ScriptSrcElem));
        assert!(collection.has_entries(HashDirective::StyleSrcElem));
    }

    #[test]
    fn test_csp_token_rendering() {
        let entry = HashEntry::new(HashAlgorithm::Sha256, "abc123");
        assert_eq!(entry.csp_token(), "'sha256-abc123'");
    }

    #[test]
    fn test_concurrent_adds_converge() {
        use std::sync::Arc;

        let collection = Arc::new(HashCollection::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let collection = Arc::clone(&collection);
            handles.push(std::thread::spawn(move || {
                for i in 0..16 {
                    collection.add(
                        HashDirective::ScriptSrcElem,
                        HashEntry::new(HashAlgorithm::Sha256, format!("digest-{}", i)),
                    );
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // every thread inserted the same 16 digests
        assert_eq!(collection.entries_for(HashDirective::ScriptSrcElem).len(), 16);
    }
}
