// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Hook contract consumed from the build pipeline
//!
//! The host calls these in its own lifecycle order: `on_module_load` when
//! a module is offered for loading, `on_module_transform` once per
//! transformed module (out-of-order and overlapped calls allowed), and
//! `on_html_finalize` exactly once after bundling. Transform hooks are
//! observational - module code is never rewritten by this plugin.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::error::Result;

/// Digest of one emitted bundle asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleAsset {
    /// Base64 digest of the emitted file content
    pub digest: String,
    /// Algorithm the digest was produced with
    pub algorithm: HashAlgorithm,
}

/// Final output-file map supplied by the pipeline after asset emission:
/// output file name -> content digest. Read-only to this plugin.
pub type BundleContext = HashMap<String, BundleAsset>;

/// Build-pipeline hook surface
#[async_trait]
pub trait BuildHooks: Send + Sync {
    /// A module is offered for loading; register it before transformation
    async fn on_module_load(&self, id: &str);

    /// A module's source is available for scanning
    async fn on_module_transform(&self, id: &str, code: &str);

    /// The final HTML is ready; returns the rewritten document
    async fn on_html_finalize(
        &self,
        html: &str,
        bundle: Option<&BundleContext>,
    ) -> Result<String>;

    /// A dev server is available for the header-insertion workaround
    fn on_server_attach(&self, server: Arc<dyn DevServer>);
}

/// Dev-server handle for the alternate policy transport
///
/// Hosts that cannot rewrite the served HTML per request set the policy as
/// a response header instead of a meta tag.
#[async_trait]
pub trait DevServer: Send + Sync {
    /// Apply a serialized policy value as the CSP response header
    async fn apply_policy_header(&self, value: &str) -> Result<()>;
}
