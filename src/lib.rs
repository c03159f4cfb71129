// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # cspforge - Build-Time CSP and SRI Synthesis
//!
//! Synthesizes a Content-Security-Policy for a web build by statically
//! discovering every inline script, inline style, and referenced external
//! script/style that ships in the final bundle, digesting each one, and
//! injecting the merged policy into the final HTML. External resources are
//! annotated with subresource-integrity digests once their bundled content
//! is known.
//!
//! ## Features
//!
//! - Hash-based policies: sha256/sha384/sha512 source tokens, no nonces
//! - Incremental collection: one scan per module, any completion order
//! - Completion barrier: HTML finalizes only after every scan resolved
//! - SRI rewriting: integrity attributes from the emitted bundle map
//! - Policy merging: user overrides over a 'self'-only default
//! - Gap warnings: unpermitted sources never fail the build
//! - Dev mode: opt-in best-effort policy over a header transport
//!
//! ## Example
//!
//! ```rust,no_run
//! use cspforge::{BuildHooks, CspOptions, CspPlugin, HostBuildConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plugin = CspPlugin::new(CspOptions::new());
//!     plugin.configure(&HostBuildConfig::production_spa())?;
//!
//!     // the pipeline drives these per module, in any order
//!     plugin.on_module_load("/src/app.css").await;
//!     plugin
//!         .on_module_transform("/src/app.css", "body { margin: 0; }")
//!         .await;
//!
//!     // once, after bundling
//!     let html = plugin
//!         .on_html_finalize("<html><head></head><body></body></html>", None)
//!         .await?;
//!     println!("{}", html);
//!
//!     Ok(())
//! }
//! ```

pub mod collect;
pub mod digest;
pub mod dom;
pub mod error;
pub mod html;
pub mod pipeline;
pub mod policy;
pub mod scan;

// Re-exports for convenience

// Digesting
pub use digest::{csp_token, digest, digest_bytes, integrity_value, HashAlgorithm};

// Aggregation state
pub use collect::{CompletionTracker, HashCollection, HashDirective, HashEntry};

// Module scanning
pub use scan::{classify, ModuleKind, ModuleScanner};

// HTML pass
pub use html::{inject_meta, HtmlProcessor, HtmlScanReport, PolicyGapWarning};

// Policy
pub use policy::{default_policy, meta_tag, synthesize, Policy, PolicySynthesis};

// Pipeline surface
pub use pipeline::{
    AppKind, BuildCommand, BuildHooks, BuildPhase, BundleAsset, BundleContext, CspOptions,
    CspPlugin, DevServer, HostBuildConfig,
};

// DOM
pub use dom::{Document, Element, Node};

// Errors
pub use error::{Error, Result};

/// cspforge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
