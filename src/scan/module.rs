// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Module scanner
//!
//! One scan per transformed module: classify, extract inline-destined
//! payloads, digest them into the collection, and flip the module's
//! tracker entry. Scanning is observational - module content is never
//! mutated here; rewriting happens only in the HTML phase.

use std::sync::Arc;

use crate::collect::{CompletionTracker, HashCollection, HashDirective, HashEntry};
use crate::digest::{digest, HashAlgorithm};

use super::{classify, extract_inline_styles, ModuleKind};

/// Scans source modules into the per-build aggregation state
#[derive(Debug, Clone)]
pub struct ModuleScanner {
    algorithm: HashAlgorithm,
    collection: Arc<HashCollection>,
    tracker: Arc<CompletionTracker>,
}

impl ModuleScanner {
    /// Create a scanner bound to one build's collection and tracker
    pub fn new(
        algorithm: HashAlgorithm,
        collection: Arc<HashCollection>,
        tracker: Arc<CompletionTracker>,
    ) -> Self {
        Self {
            algorithm,
            collection,
            tracker,
        }
    }

    /// Register a module offered for loading
    ///
    /// Unsupported kinds are not registered and not an error. Returns the
    /// classified kind for callers that branch on it.
    pub fn register(&self, id: &str) -> ModuleKind {
        let kind = classify(id);
        if kind.is_scannable() {
            self.tracker.register(id);
        }
        kind
    }

    /// Scan one module's source text
    ///
    /// Always marks the module done exactly once, including when nothing
    /// hashable was found, so the completion barrier cannot deadlock on a
    /// module with no inline content.
    pub fn scan(&self, id: &str, code: &str) {
        let kind = classify(id);
        match kind {
            ModuleKind::Style => {
                self.add_style_hash(code);
            }
            ModuleKind::Script => {
                for sheet in extract_inline_styles(code) {
                    self.add_style_hash(&sheet);
                }
            }
            ModuleKind::Other => return,
        }

        self.tracker.mark_done(id);
        tracing::trace!(module = id, kind = ?kind, "module scanned");
    }

    fn add_style_hash(&self, content: &str) {
        let entry = HashEntry::new(self.algorithm, digest(content, self.algorithm));
        self.collection.add(HashDirective::StyleSrcElem, entry);
    }
}
