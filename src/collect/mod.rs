// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-build aggregation state
//!
//! - Hash collection: append-only directive -> digest store
//! - Completion tracker: the readiness registry behind the HTML barrier
//!
//! Both are created fresh for every build invocation and dropped when the
//! HTML phase completes.

mod collection;
mod tracker;

pub use collection::{HashCollection, HashDirective, HashEntry};
pub use tracker::CompletionTracker;
