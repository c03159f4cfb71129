// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Policy injection
//!
//! Prepends the CSP meta element to `<head>` so it precedes every resource
//! the policy governs.

use crate::dom::parse_html;
use crate::error::{Error, Result};

/// Inject a serialized policy value as a meta tag at the head of `<head>`
pub fn inject_meta(html: &str, policy_value: &str) -> Result<String> {
    let doc = parse_html(html)?;

    let head = doc
        .head()
        .ok_or_else(|| Error::html_parse("document has no <head> element"))?;

    let meta = doc.create_element("meta");
    meta.set_attribute("http-equiv", "Content-Security-Policy");
    meta.set_attribute("content", policy_value);
    head.node.prepend_child(&meta.node);

    Ok(doc.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_is_prepended_to_head() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let out = inject_meta(html, "default-src 'self';").unwrap();

        let meta_pos = out.find("http-equiv=\"Content-Security-Policy\"").unwrap();
        let title_pos = out.find("<title>").unwrap();
        assert!(meta_pos < title_pos);
        assert!(out.contains(r#"content="default-src 'self';""#));
    }

    #[test]
    fn test_meta_injection_synthesizes_head() {
        // the parser builds the implied skeleton for fragment documents
        let out = inject_meta("<p>hello</p>", "default-src 'self';").unwrap();
        assert!(out.contains("Content-Security-Policy"));
        assert!(out.contains("<p>hello</p>"));
    }
}
