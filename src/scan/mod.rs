// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Source module scanning
//!
//! Classifies pipeline modules, extracts inline-destined payloads, and
//! feeds the per-build hash collection and completion tracker.

mod classify;
mod extract;
mod module;

pub use classify::{classify, ModuleKind};
pub use extract::extract_inline_styles;
pub use module::ModuleScanner;
