// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML scanner and rewriter
//!
//! Walks script and style elements of the final document. Inline content
//! is digested into the hash collection; external sources are checked
//! against the draft policy and annotated with integrity attributes when
//! the bundle map knows their digest. Element failures are contained: one
//! malformed element is logged and skipped, the rest of the document is
//! still processed.

use serde::{Deserialize, Serialize};

use crate::collect::{HashCollection, HashDirective, HashEntry};
use crate::digest::{digest, integrity_value, HashAlgorithm};
use crate::dom::{parse_html, Element};
use crate::error::Result;
use crate::pipeline::BundleContext;
use crate::policy::Policy;

/// Marker used as the warning source for inline content
const INLINE_SOURCE: &str = "(inline)";

/// Non-fatal report: content of a kind was observed with no permitting token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyGapWarning {
    /// Directive that would have to permit the content
    pub directive: String,
    /// The offending source URL, or `(inline)` for inline content
    pub source: String,
}

impl std::fmt::Display for PolicyGapWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} does not permit {}; the policy may block this content",
            self.directive, self.source
        )
    }
}

/// Outcome of one scan/rewrite pass
#[derive(Debug, Clone)]
pub struct HtmlScanReport {
    /// Rewritten document text
    pub html: String,
    /// Gap warnings, deduplicated, in discovery order
    pub warnings: Vec<PolicyGapWarning>,
}

/// The post-bundle HTML pass
pub struct HtmlProcessor<'a> {
    algorithm: HashAlgorithm,
    policy: &'a Policy,
    collection: &'a HashCollection,
    bundle: Option<&'a BundleContext>,
}

impl<'a> HtmlProcessor<'a> {
    /// Create a processor for one document pass
    pub fn new(
        algorithm: HashAlgorithm,
        policy: &'a Policy,
        collection: &'a HashCollection,
        bundle: Option<&'a BundleContext>,
    ) -> Self {
        Self {
            algorithm,
            policy,
            collection,
            bundle,
        }
    }

    /// Scan and rewrite a serialized document
    pub fn process(&self, html: &str) -> Result<HtmlScanReport> {
        let doc = parse_html(html)?;
        let mut warnings = Warnings::default();

        for script in doc.query_selector_all("script") {
            self.guarded(&script, |el| self.process_script(el, &mut warnings));
        }

        for style in doc.query_selector_all("style") {
            self.guarded(&style, |el| self.process_inline_style(el, &mut warnings));
        }

        for link in doc.query_selector_all("link[rel=stylesheet]") {
            self.guarded(&link, |el| self.process_stylesheet_link(el, &mut warnings));
        }

        if self.policy.has_directive("style-src-attr") {
            for styled in doc.query_selector_all("[style]") {
                self.guarded(&styled, |el| self.process_style_attribute(el));
            }
        }

        Ok(HtmlScanReport {
            html: doc.to_html(),
            warnings: warnings.into_vec(),
        })
    }

    /// Run one element handler, containing its failure
    fn guarded<F>(&self, element: &Element, handler: F)
    where
        F: FnOnce(&Element) -> Result<()>,
    {
        if let Err(error) = handler(element) {
            tracing::error!(
                tag = %element.local_name(),
                %error,
                "element skipped during HTML scan"
            );
        }
    }

    /// `<script src>` is external-only: inline text under a src attribute
    /// is inert in browsers and must not be hashed.
    fn process_script(&self, element: &Element, warnings: &mut Warnings) -> Result<()> {
        if let Some(src) = element.src().filter(|s| !s.is_empty()) {
            if !self.policy.permits("script-src", &src) {
                warnings.push("script-src", &src);
            }
            self.attach_integrity(element, &src);
            return Ok(());
        }

        let text = element.text_content();
        if text.is_empty() {
            return Ok(());
        }

        self.collection.add(
            HashDirective::ScriptSrcElem,
            HashEntry::new(self.algorithm, digest(&text, self.algorithm)),
        );
        if !self.policy.has_directive("script-src") {
            warnings.push("script-src", INLINE_SOURCE);
        }
        Ok(())
    }

    fn process_inline_style(&self, element: &Element, warnings: &mut Warnings) -> Result<()> {
        let text = element.text_content();
        if text.is_empty() {
            return Ok(());
        }

        self.collection.add(
            HashDirective::StyleSrcElem,
            HashEntry::new(self.algorithm, digest(&text, self.algorithm)),
        );
        if !self.policy.has_directive("style-src") {
            warnings.push("style-src", INLINE_SOURCE);
        }
        Ok(())
    }

    fn process_stylesheet_link(&self, element: &Element, warnings: &mut Warnings) -> Result<()> {
        let href = match element.href().filter(|h| !h.is_empty()) {
            Some(href) => href,
            None => return Ok(()),
        };

        if !self.policy.permits("style-src", &href) {
            warnings.push("style-src", &href);
        }
        self.attach_integrity(element, &href);
        Ok(())
    }

    fn process_style_attribute(&self, element: &Element) -> Result<()> {
        let value = match element.get_attribute("style").filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => return Ok(()),
        };

        self.collection.add(
            HashDirective::StyleSrcAttr,
            HashEntry::new(self.algorithm, digest(&value, self.algorithm)),
        );
        Ok(())
    }

    /// Set `integrity` from the bundle map, if the source resolves to a
    /// known asset. Author-provided integrity attributes are left alone;
    /// a source missing from the map is not an error.
    fn attach_integrity(&self, element: &Element, source: &str) {
        let bundle = match self.bundle {
            Some(bundle) => bundle,
            None => return,
        };
        if element.has_attribute("integrity") {
            return;
        }

        let path = match resolve_asset_path(source) {
            Some(path) => path,
            None => return,
        };

        let asset = bundle
            .get(&path)
            .or_else(|| bundle.get(path.trim_start_matches('/')))
            .or_else(|| bundle.get(&format!("/{}", path.trim_start_matches('/'))));

        if let Some(asset) = asset {
            element.set_attribute("integrity", integrity_value(asset.algorithm, &asset.digest));
        }
    }
}

/// Resolve a src/href to the path the bundle map is keyed by
///
/// Absolute URLs reduce to their path; query strings and fragments are
/// dropped. Sources that are not plain asset paths (data:, about:) resolve
/// to nothing.
fn resolve_asset_path(source: &str) -> Option<String> {
    if source.starts_with("data:") || source.starts_with("about:") {
        return None;
    }

    let path = if source.contains("://") || source.starts_with("//") {
        let normalized = if source.starts_with("//") {
            format!("https:{}", source)
        } else {
            source.to_string()
        };
        url::Url::parse(&normalized).ok()?.path().to_string()
    } else {
        source.split(['?', '#']).next().unwrap_or(source).to_string()
    };

    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Deduplicating warning accumulator
#[derive(Default)]
struct Warnings {
    seen: Vec<PolicyGapWarning>,
}

impl Warnings {
    fn push(&mut self, directive: &str, source: &str) {
        let warning = PolicyGapWarning {
            directive: directive.to_string(),
            source: source.to_string(),
        };
        if !self.seen.contains(&warning) {
            tracing::warn!(directive = %warning.directive, source = %warning.source, "policy gap");
            self.seen.push(warning);
        }
    }

    fn into_vec(self) -> Vec<PolicyGapWarning> {
        self.seen
    }
}
