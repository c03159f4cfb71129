// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Inline payload extraction from script modules
//!
//! Dev pipelines serve stylesheets wrapped in a script module that injects
//! the sheet into the document at runtime; the sheet text ships inside the
//! script as a string literal. Those literals end up as inline `<style>`
//! content in the browser, so they must be hashed. Only literals bound by
//! a recognized style-injection wrapper are extracted - arbitrary string
//! literals in application code are never treated as inline content.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `const __vite__css = "..."` and the older `__css` binding
    static ref CSS_BINDING: Regex = Regex::new(
        r#"(?:const|var|let)\s+__(?:vite__)?css\s*=\s*"((?:\\.|[^"\\])*)""#
    ).unwrap();
    // `injectStyle("...")` / `insertStyle("...")` helper calls
    static ref INJECT_CALL: Regex = Regex::new(
        r#"(?:injectStyle|insertStyle|updateStyle)\s*\(\s*"((?:\\.|[^"\\])*)""#
    ).unwrap();
}

/// Extract stylesheet payloads embedded in a script module
///
/// Returns the unescaped sheet texts in source order, deduplicated.
pub fn extract_inline_styles(code: &str) -> Vec<String> {
    let mut payloads = Vec::new();

    for captures in CSS_BINDING.captures_iter(code).chain(INJECT_CALL.captures_iter(code)) {
        if let Some(raw) = captures.get(1) {
            let text = unescape_js_string(raw.as_str());
            if !text.is_empty() && !payloads.contains(&text) {
                payloads.push(text);
            }
        }
    }

    payloads
}

/// Undo JS double-quoted string escapes
fn unescape_js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                // \uXXXX only; surrogate pairs do not appear in emitted CSS
                let code: String = chars.by_ref().take(4).collect();
                if let Some(ch) = u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            Some(other) => out.push(other),
            None => break,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_css_binding() {
        let code = r#"
            const __vite__css = ".button { color: red; }\n"
            __vite__updateStyle(__vite__id, __vite__css)
        "#;
        let payloads = extract_inline_styles(code);
        assert_eq!(payloads, vec![".button { color: red; }\n".to_string()]);
    }

    #[test]
    fn test_extracts_inject_call() {
        let code = r#"injectStyle("body { margin: 0; }");"#;
        let payloads = extract_inline_styles(code);
        assert_eq!(payloads, vec!["body { margin: 0; }".to_string()]);
    }

    #[test]
    fn test_ignores_plain_string_literals() {
        let code = r#"const message = "p { color: blue; }"; console.log(message);"#;
        assert!(extract_inline_styles(code).is_empty());
    }

    #[test]
    fn test_unescapes_payload() {
        let code = r#"const __css = "a {\n\tcolor: \"red\";\n}""#;
        let payloads = extract_inline_styles(code);
        assert_eq!(payloads, vec!["a {\n\tcolor: \"red\";\n}".to_string()]);
    }

    #[test]
    fn test_dedupes_repeated_payloads() {
        let code = r#"
            const __css = "h1 { font-weight: bold; }"
            updateStyle("h1 { font-weight: bold; }")
        "#;
        assert_eq!(extract_inline_styles(code).len(), 1);
    }
}
