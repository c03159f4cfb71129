// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML scanning and rewriting
//!
//! The single post-bundle pass: hash inline scripts/styles, check external
//! sources against the draft policy, attach subresource-integrity
//! attributes from the bundle map, and inject the finalized policy.

mod inject;
mod rewrite;

pub use inject::inject_meta;
pub use rewrite::{HtmlProcessor, HtmlScanReport, PolicyGapWarning};
