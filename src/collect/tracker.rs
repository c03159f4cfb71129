// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Module completion tracker
//!
//! The readiness registry behind the HTML-phase barrier. The pipeline
//! registers a module the moment it is offered for loading; the scanner
//! flips it once extraction finished. The HTML phase treats the collected
//! hashes as final only when every registered module is done.

use dashmap::DashMap;

/// Tracks which registered modules have been scanned
///
/// An empty tracker (no relevant modules) is vacuously complete.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    scanned: DashMap<String, bool>,
}

impl CompletionTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module as pending
    ///
    /// No-op when the id is already present: a module revisited by the
    /// pipeline must not be un-scanned.
    pub fn register(&self, id: impl Into<String>) {
        self.scanned.entry(id.into()).or_insert(false);
    }

    /// Mark a registered module as scanned
    ///
    /// An id that was never registered is ignored; an unexpected hook
    /// ordering from the host must not crash the build.
    pub fn mark_done(&self, id: &str) {
        match self.scanned.get_mut(id) {
            Some(mut done) => *done = true,
            None => {
                tracing::debug!(module = id, "completion for unregistered module ignored");
            }
        }
    }

    /// Check whether a module is registered
    pub fn is_registered(&self, id: &str) -> bool {
        self.scanned.contains_key(id)
    }

    /// True iff the tracker is empty or every registered module is scanned
    pub fn is_complete(&self) -> bool {
        self.scanned.iter().all(|entry| *entry.value())
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.scanned.len()
    }

    /// Check whether no modules were registered
    pub fn is_empty(&self) -> bool {
        self.scanned.is_empty()
    }

    /// Number of modules still awaiting a scan
    pub fn pending(&self) -> usize {
        self.scanned.iter().filter(|entry| !*entry.value()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_is_complete() {
        let tracker = CompletionTracker::new();
        assert!(tracker.is_complete());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_registered_module_blocks_completion() {
        let tracker = CompletionTracker::new();
        tracker.register("/src/app.ts");
        assert!(!tracker.is_complete());
        assert_eq!(tracker.pending(), 1);

        tracker.mark_done("/src/app.ts");
        assert!(tracker.is_complete());
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn test_completion_order_is_irrelevant() {
        let tracker = CompletionTracker::new();
        tracker.register("a");
        tracker.register("b");
        tracker.register("c");

        tracker.mark_done("c");
        tracker.mark_done("a");
        assert!(!tracker.is_complete());

        tracker.mark_done("b");
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_reregister_does_not_unscan() {
        let tracker = CompletionTracker::new();
        tracker.register("a");
        tracker.mark_done("a");

        tracker.register("a");
        assert!(tracker.is_complete());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_unregistered_completion_is_ignored() {
        let tracker = CompletionTracker::new();
        tracker.mark_done("never-registered");
        assert!(tracker.is_empty());
        assert!(tracker.is_complete());
    }
}
