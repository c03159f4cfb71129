// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Plugin configuration and host build description

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::digest::HashAlgorithm;
use crate::policy::{default_policy, Policy};

/// User-facing plugin options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CspOptions {
    /// Digest algorithm for collected hashes (default sha256)
    pub algorithm: HashAlgorithm,
    /// Per-directive overrides merged over the default policy
    pub policy: Option<BTreeMap<String, Vec<String>>>,
    /// Opt into the best-effort dev-serve mode
    pub run_in_dev_mode: bool,
}

impl CspOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the digest algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Override one directive's token list
    pub fn policy_directive(
        mut self,
        directive: impl Into<String>,
        tokens: Vec<String>,
    ) -> Self {
        self.policy
            .get_or_insert_with(BTreeMap::new)
            .insert(directive.into(), tokens);
        self
    }

    /// Opt into dev-serve collection
    pub fn run_in_dev_mode(mut self, enabled: bool) -> Self {
        self.run_in_dev_mode = enabled;
        self
    }

    /// The draft policy this configuration resolves to
    ///
    /// Default policy merged with the user's per-directive overrides;
    /// hash tokens are added later by the synthesizer.
    pub fn draft_policy(&self) -> Policy {
        match &self.policy {
            Some(overrides) => Policy::merge(&default_policy(), &Policy::from_map(overrides)),
            None => default_policy(),
        }
    }
}

/// Pipeline command driving the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildCommand {
    /// Production build
    Build,
    /// Dev server
    Serve,
}

/// Application kind the host is building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    /// Single-page application
    Spa,
    /// Multi-page application
    Mpa,
    /// Custom app type
    Custom,
}

/// Resolved host build configuration, as handed to `CspPlugin::configure`
#[derive(Debug, Clone)]
pub struct HostBuildConfig {
    /// Command driving the run
    pub command: BuildCommand,
    /// Host mode string ("development", "production", ...)
    pub mode: String,
    /// Application kind
    pub app_kind: AppKind,
    /// Whether this is a server-side-rendering build
    pub ssr: bool,
}

impl HostBuildConfig {
    /// A production SPA build
    pub fn production_spa() -> Self {
        Self {
            command: BuildCommand::Build,
            mode: "production".to_string(),
            app_kind: AppKind::Spa,
            ssr: false,
        }
    }

    /// A development serve run
    pub fn dev_serve() -> Self {
        Self {
            command: BuildCommand::Serve,
            mode: "development".to_string(),
            app_kind: AppKind::Spa,
            ssr: false,
        }
    }

    /// Check whether this run is a dev-server command
    pub fn is_dev_command(&self) -> bool {
        self.command == BuildCommand::Serve && self.mode == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = CspOptions::new();
        assert_eq!(options.algorithm, HashAlgorithm::Sha256);
        assert!(!options.run_in_dev_mode);
        assert!(options.policy.is_none());
    }

    #[test]
    fn test_options_deserialization() {
        let options: CspOptions = serde_json::from_str(
            r#"{
                "algorithm": "sha384",
                "policy": { "script-src": ["'self'", "https://cdn.example.com"] },
                "runInDevMode": true
            }"#,
        )
        .unwrap();

        assert_eq!(options.algorithm, HashAlgorithm::Sha384);
        assert!(options.run_in_dev_mode);
        assert_eq!(
            options.draft_policy().get("script-src").unwrap(),
            &["'self'", "https://cdn.example.com"]
        );
    }

    #[test]
    fn test_draft_policy_merges_overrides() {
        let options = CspOptions::new()
            .policy_directive("object-src", vec!["'none'".to_string()]);

        let draft = options.draft_policy();
        assert_eq!(draft.get("object-src").unwrap(), &["'none'"]);
        assert_eq!(draft.get("default-src").unwrap(), &["'self'"]);
    }

    #[test]
    fn test_dev_command_detection() {
        assert!(HostBuildConfig::dev_serve().is_dev_command());
        assert!(!HostBuildConfig::production_spa().is_dev_command());
    }
}
