// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Policy representation
//!
//! A policy is an ordered mapping from directive name to an ordered,
//! deduplicated token list. Order matters twice: serialization must be
//! byte-stable across identical builds, and the default policy's directive
//! order leads the final document.

use std::collections::BTreeMap;

/// An ordered CSP: directive name -> source tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    entries: Vec<(String, Vec<String>)>,
}

impl Policy {
    /// Create an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a name -> tokens map (directives in map order)
    pub fn from_map(map: &BTreeMap<String, Vec<String>>) -> Self {
        let mut policy = Policy::new();
        for (name, tokens) in map {
            policy.set(name.clone(), tokens.clone());
        }
        policy
    }

    /// Check whether the policy has no directives
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of directives
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tokens for a directive
    pub fn get(&self, directive: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == directive)
            .map(|(_, tokens)| tokens.as_slice())
    }

    /// Check whether a directive is present with at least one token
    pub fn has_directive(&self, directive: &str) -> bool {
        self.get(directive).map(|t| !t.is_empty()).unwrap_or(false)
    }

    /// Replace a directive's token list, keeping its position; appends new
    /// directives at the tail
    pub fn set(&mut self, directive: impl Into<String>, tokens: Vec<String>) {
        let directive = directive.into();
        match self.entries.iter_mut().find(|(name, _)| *name == directive) {
            Some((_, existing)) => *existing = tokens,
            None => self.entries.push((directive, tokens)),
        }
    }

    /// Append a token to a directive, creating the directive if absent;
    /// duplicate tokens are a no-op
    pub fn append_token(&mut self, directive: impl Into<String>, token: impl Into<String>) {
        let directive = directive.into();
        let token = token.into();
        match self.entries.iter_mut().find(|(name, _)| *name == directive) {
            Some((_, tokens)) => {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
            None => self.entries.push((directive, vec![token])),
        }
    }

    /// Iterate directives in policy order
    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    /// Structural merge of a base policy with user overrides
    ///
    /// Directive-wise: an override directive replaces the base directive's
    /// literal token list outright; base directives without an override are
    /// kept; override-only directives are appended after the base order.
    /// Hash tokens never pass through here - the synthesizer adds them on
    /// top, so they are additive regardless of overrides.
    pub fn merge(base: &Policy, overrides: &Policy) -> Policy {
        let mut merged = Policy::new();
        for (name, tokens) in base.directives() {
            let effective = overrides.get(name).unwrap_or(tokens);
            merged.set(name, effective.to_vec());
        }
        for (name, tokens) in overrides.directives() {
            if merged.get(name).is_none() {
                merged.set(name, tokens.to_vec());
            }
        }
        merged
    }

    /// Check whether a directive's tokens permit an external source
    ///
    /// Relative and root-relative URLs are covered by 'self'; absolute and
    /// protocol-relative URLs need a token naming their host (exact, origin
    /// prefix, or *.wildcard). A bare `*` permits everything.
    pub fn permits(&self, directive: &str, source: &str) -> bool {
        let tokens = match self.get(directive) {
            Some(tokens) if !tokens.is_empty() => tokens,
            _ => return false,
        };

        if tokens.iter().any(|t| t == "*") {
            return true;
        }

        if source.starts_with("data:") {
            return tokens.iter().any(|t| t == "data:");
        }

        if is_relative(source) {
            return tokens.iter().any(|t| t == "'self'");
        }

        let source_host = host_of(source);
        tokens.iter().any(|token| {
            if token.starts_with('\'') {
                return false;
            }
            if token == source || source.starts_with(token.as_str()) {
                return true;
            }
            match (&source_host, host_of(token)) {
                (Some(sh), Some(th)) => {
                    if let Some(suffix) = th.strip_prefix("*.") {
                        sh.ends_with(suffix)
                    } else {
                        *sh == th
                    }
                }
                _ => false,
            }
        })
    }

    /// Serialize to a policy string
    ///
    /// `directive token1 token2; ...;` - directives in policy order,
    /// empty directives skipped, semicolon-terminated.
    pub fn serialize(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, tokens)| !tokens.is_empty())
            .map(|(name, tokens)| format!("{} {};", name, tokens.join(" ")))
            .collect();
        parts.join(" ")
    }
}

/// Check whether a source URL is same-origin relative
fn is_relative(source: &str) -> bool {
    !source.contains("://") && !source.starts_with("//")
}

/// Extract the host portion of a URL or host token
fn host_of(source: &str) -> Option<String> {
    if source.starts_with("*.") {
        return Some(source.to_string());
    }
    let normalized = if source.starts_with("//") {
        format!("https:{}", source)
    } else if !source.contains("://") {
        format!("https://{}", source)
    } else {
        source.to_string()
    };
    url::Url::parse(&normalized)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}
