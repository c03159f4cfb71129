// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The CSP plugin
//!
//! Owns one build's aggregation state and walks the phase machine
//! IDLE -> COLLECTING -> HTML_FINALIZING -> DONE. The HTML phase is the
//! single synchronization point: in production mode it blocks on the
//! completion tracker (bounded poll) before treating the collection as
//! final; in dev mode the barrier is advisory and collection interleaves
//! with per-request finalization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::collect::{CompletionTracker, HashCollection};
use crate::digest::HashAlgorithm;
use crate::error::{Error, Result};
use crate::html::{inject_meta, HtmlProcessor};
use crate::policy::{synthesize, Policy};
use crate::scan::ModuleScanner;

use super::config::{AppKind, CspOptions, HostBuildConfig};
use super::hooks::{BuildHooks, BundleContext, DevServer};

/// Interval between readiness checks while the HTML phase waits
const BARRIER_POLL: Duration = Duration::from_millis(50);
/// Deadline after which the HTML phase proceeds with a partial collection
const BARRIER_DEADLINE: Duration = Duration::from_secs(5);

/// Per-build phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Created, not yet collecting
    Idle,
    /// Module scans in flight
    Collecting,
    /// Completion barrier checked, HTML pass running
    HtmlFinalizing,
    /// Policy injected
    Done,
}

/// Build-scoped CSP synthesis plugin
///
/// One instance per build invocation; all aggregation state lives here and
/// is discarded with the plugin.
pub struct CspPlugin {
    algorithm: HashAlgorithm,
    draft_policy: Policy,
    run_in_dev_mode: bool,
    dev_mode: AtomicBool,
    enabled: AtomicBool,
    collection: Arc<HashCollection>,
    tracker: Arc<CompletionTracker>,
    scanner: ModuleScanner,
    phase: RwLock<BuildPhase>,
    server: RwLock<Option<Arc<dyn DevServer>>>,
}

impl CspPlugin {
    /// Create a plugin for one build
    pub fn new(options: CspOptions) -> Self {
        let collection = Arc::new(HashCollection::new());
        let tracker = Arc::new(CompletionTracker::new());
        let scanner = ModuleScanner::new(
            options.algorithm,
            Arc::clone(&collection),
            Arc::clone(&tracker),
        );

        Self {
            algorithm: options.algorithm,
            draft_policy: options.draft_policy(),
            run_in_dev_mode: options.run_in_dev_mode,
            dev_mode: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
            collection,
            tracker,
            scanner,
            phase: RwLock::new(BuildPhase::Idle),
            server: RwLock::new(None),
        }
    }

    /// Validate the host build configuration
    ///
    /// Must be called before any scanning. Non-SPA and SSR targets are
    /// fatal; a dev serve without the dev-mode opt-in disables the plugin
    /// for the run instead of failing it.
    pub fn configure(&self, host: &HostBuildConfig) -> Result<()> {
        if host.is_dev_command() {
            if self.run_in_dev_mode {
                self.dev_mode.store(true, Ordering::SeqCst);
            } else {
                tracing::warn!(
                    "dev server detected but runInDevMode is disabled; \
                     no policy will be produced for this run"
                );
                self.enabled.store(false, Ordering::SeqCst);
            }
        }

        if host.app_kind != AppKind::Spa {
            return Err(Error::config("only SPA builds are supported"));
        }
        if host.ssr {
            return Err(Error::config("SSR builds are not supported"));
        }

        Ok(())
    }

    /// Current build phase
    pub fn phase(&self) -> BuildPhase {
        *self.phase.read()
    }

    /// Whether the plugin resolved to dev mode
    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode.load(Ordering::SeqCst)
    }

    /// Whether the plugin is active for this run
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// This build's hash collection
    pub fn collection(&self) -> &HashCollection {
        &self.collection
    }

    /// This build's completion tracker
    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Serialized best-effort policy over the current collection
    ///
    /// The dev-mode header transport reads this per request; in production
    /// the value is only meaningful after the HTML phase completed.
    pub fn header_value(&self) -> String {
        synthesize(&self.draft_policy, &self.collection).header_value
    }

    /// Block until every registered module is scanned, or the deadline
    /// expires
    ///
    /// The host pipeline is expected to order the HTML hook after all
    /// transforms; the poll makes that contract explicit instead of
    /// silently finalizing over a partial collection.
    async fn await_scan_completion(&self) {
        let deadline = tokio::time::Instant::now() + BARRIER_DEADLINE;

        while !self.tracker.is_complete() {
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(
                    pending = self.tracker.pending(),
                    "module scans still pending at finalize deadline; \
                     proceeding with a partial policy"
                );
                break;
            }
            tokio::time::sleep(BARRIER_POLL).await;
        }
    }
}

#[async_trait]
impl BuildHooks for CspPlugin {
    async fn on_module_load(&self, id: &str) {
        if !self.is_enabled() {
            return;
        }

        {
            let mut phase = self.phase.write();
            if *phase == BuildPhase::Idle {
                *phase = BuildPhase::Collecting;
            }
        }
        self.scanner.register(id);
    }

    async fn on_module_transform(&self, id: &str, code: &str) {
        if !self.is_enabled() {
            return;
        }
        self.scanner.scan(id, code);
    }

    async fn on_html_finalize(
        &self,
        html: &str,
        bundle: Option<&BundleContext>,
    ) -> Result<String> {
        if !self.is_enabled() {
            return Ok(html.to_string());
        }

        *self.phase.write() = BuildPhase::HtmlFinalizing;

        if self.is_dev_mode() {
            // Best-effort: requests served after this point may carry
            // content the policy has not seen yet.
            if !self.tracker.is_complete() {
                tracing::debug!(
                    pending = self.tracker.pending(),
                    "finalizing in dev mode with incomplete scans"
                );
            }
        } else {
            self.await_scan_completion().await;
        }

        let processor =
            HtmlProcessor::new(self.algorithm, &self.draft_policy, &self.collection, bundle);
        let report = processor.process(html)?;

        let synthesis = synthesize(&self.draft_policy, &self.collection);

        let server = self.server.read().clone();
        let output = match server {
            Some(server) if self.is_dev_mode() => {
                server.apply_policy_header(&synthesis.header_value).await?;
                report.html
            }
            _ => inject_meta(&report.html, &synthesis.header_value)?,
        };

        *self.phase.write() = BuildPhase::Done;
        tracing::info!(
            directives = synthesis.policy.len(),
            hashes = self.collection.len(),
            warnings = report.warnings.len(),
            "policy finalized"
        );

        Ok(output)
    }

    fn on_server_attach(&self, server: Arc<dyn DevServer>) {
        *self.server.write() = Some(server);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digest;
    use crate::pipeline::BundleAsset;

    fn configured_plugin(options: CspOptions) -> CspPlugin {
        let plugin = CspPlugin::new(options);
        plugin.configure(&HostBuildConfig::production_spa()).unwrap();
        plugin
    }

    #[tokio::test]
    async fn test_inline_script_ends_up_in_meta_policy() {
        let plugin = configured_plugin(CspOptions::new());

        let html = "<html><head></head><body><script>alert(1)</script></body></html>";
        let output = plugin.on_html_finalize(html, None).await.unwrap();

        let token = format!("'sha256-{}'", digest("alert(1)", HashAlgorithm::Sha256));
        assert!(output.contains("Content-Security-Policy"));
        assert!(output.contains(&token));
        assert!(output.contains("script-src-elem"));
        assert_eq!(plugin.phase(), BuildPhase::Done);
    }

    #[tokio::test]
    async fn test_external_script_gains_integrity() {
        let plugin = configured_plugin(CspOptions::new());

        let mut bundle = BundleContext::new();
        bundle.insert(
            "/assets/app-abc123.js".to_string(),
            BundleAsset {
                digest: "D".to_string(),
                algorithm: HashAlgorithm::Sha256,
            },
        );

        let html = r#"<html><head></head><body><script src="/assets/app-abc123.js"></script></body></html>"#;
        let output = plugin.on_html_finalize(html, Some(&bundle)).await.unwrap();

        assert!(output.contains(r#"integrity="sha256-D""#));
    }

    #[tokio::test]
    async fn test_module_without_content_resolves_tracker() {
        let plugin = configured_plugin(CspOptions::new());

        plugin.on_module_load("/src/main.ts").await;
        assert_eq!(plugin.phase(), BuildPhase::Collecting);
        assert!(!plugin.tracker().is_complete());

        plugin
            .on_module_transform("/src/main.ts", "export {};")
            .await;
        assert!(plugin.tracker().is_complete());
        assert!(plugin.collection().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_waits_for_inflight_scan() {
        let plugin = Arc::new(CspPlugin::new(CspOptions::new()));
        plugin.configure(&HostBuildConfig::production_spa()).unwrap();

        plugin.on_module_load("/src/app.css").await;

        let background = Arc::clone(&plugin);
        let scan = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            background
                .on_module_transform("/src/app.css", "body { margin: 0; }")
                .await;
        });

        let html = "<html><head></head><body></body></html>";
        let output = plugin.on_html_finalize(html, None).await.unwrap();
        scan.await.unwrap();

        let token = format!(
            "'sha256-{}'",
            digest("body { margin: 0; }", HashAlgorithm::Sha256)
        );
        assert!(output.contains(&token));
    }

    #[tokio::test]
    async fn test_out_of_order_scans_converge() {
        let plugin = configured_plugin(CspOptions::new());

        plugin.on_module_load("/src/a.css").await;
        plugin.on_module_load("/src/b.css").await;

        // completion order inverted relative to registration
        plugin.on_module_transform("/src/b.css", "b { color: blue; }").await;
        plugin.on_module_transform("/src/a.css", "a { color: red; }").await;

        assert!(plugin.tracker().is_complete());
        assert_eq!(plugin.collection().len(), 2);
    }

    #[tokio::test]
    async fn test_dev_serve_without_opt_in_disables_plugin() {
        let plugin = CspPlugin::new(CspOptions::new());
        plugin.configure(&HostBuildConfig::dev_serve()).unwrap();
        assert!(!plugin.is_enabled());

        let html = "<html><head></head><body><script>alert(1)</script></body></html>";
        let output = plugin.on_html_finalize(html, None).await.unwrap();
        assert_eq!(output, html);
    }

    #[tokio::test]
    async fn test_dev_serve_with_opt_in_uses_header_transport() {
        struct RecordingServer {
            value: parking_lot::Mutex<Option<String>>,
        }

        #[async_trait]
        impl DevServer for RecordingServer {
            async fn apply_policy_header(&self, value: &str) -> Result<()> {
                *self.value.lock() = Some(value.to_string());
                Ok(())
            }
        }

        let plugin = CspPlugin::new(CspOptions::new().run_in_dev_mode(true));
        plugin.configure(&HostBuildConfig::dev_serve()).unwrap();
        assert!(plugin.is_dev_mode());

        let server = Arc::new(RecordingServer {
            value: parking_lot::Mutex::new(None),
        });
        plugin.on_server_attach(Arc::clone(&server) as Arc<dyn DevServer>);

        let html = "<html><head></head><body><script>alert(1)</script></body></html>";
        let output = plugin.on_html_finalize(html, None).await.unwrap();

        // header transport, not a meta tag
        assert!(!output.contains("Content-Security-Policy"));
        let header = server.value.lock().clone().unwrap();
        assert!(header.contains("script-src-elem"));
        assert_eq!(plugin.header_value(), header);
    }

    #[test]
    fn test_configure_rejects_ssr() {
        let plugin = CspPlugin::new(CspOptions::new());
        let mut host = HostBuildConfig::production_spa();
        host.ssr = true;

        let err = plugin.configure(&host).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_configure_rejects_mpa() {
        let plugin = CspPlugin::new(CspOptions::new());
        let mut host = HostBuildConfig::production_spa();
        host.app_kind = AppKind::Mpa;

        assert!(plugin.configure(&host).is_err());
    }

    #[tokio::test]
    async fn test_user_policy_overrides_survive_finalize() {
        let options = CspOptions::new().policy_directive(
            "script-src",
            vec!["'self'".to_string(), "https://cdn.example.com".to_string()],
        );
        let plugin = configured_plugin(options);

        let html = "<html><head></head><body></body></html>";
        let output = plugin.on_html_finalize(html, None).await.unwrap();

        assert!(output.contains("script-src 'self' https://cdn.example.com;"));
    }
}
