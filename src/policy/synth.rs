// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Policy synthesis
//!
//! Folds the per-build hash collection into the merged draft policy and
//! renders the value injected into the document (or handed to a dev server
//! as a header). Rendering is deterministic: default-policy directive order
//! first, user-only directives next, hash directives created on demand at
//! the tail, hash tokens in collection insertion order.

use crate::collect::{HashCollection, HashDirective};

use super::Policy;

/// A finalized policy plus its rendered forms
#[derive(Debug, Clone)]
pub struct PolicySynthesis {
    /// The final policy value
    pub policy: Policy,
    /// Serialized directive string, usable as a header value
    pub header_value: String,
}

impl PolicySynthesis {
    /// The `<meta>` element carrying this policy
    pub fn meta_tag(&self) -> String {
        meta_tag(&self.header_value)
    }
}

/// Merge the draft policy with every collected hash and render it
///
/// `draft` is the already-merged default+user policy the build ran with.
/// Hash tokens are purely additive: they extend a directive's token list
/// and never replace literal tokens, so synthesis commutes with any
/// module-scan completion order.
pub fn synthesize(draft: &Policy, collection: &HashCollection) -> PolicySynthesis {
    let mut policy = draft.clone();

    for directive in HashDirective::all() {
        for entry in collection.entries_for(directive) {
            policy.append_token(directive.as_str(), entry.csp_token());
        }
    }

    let header_value = policy.serialize();
    PolicySynthesis {
        policy,
        header_value,
    }
}

/// Render a policy value as a CSP meta element
pub fn meta_tag(policy_value: &str) -> String {
    format!(
        r#"<meta http-equiv="Content-Security-Policy" content="{}">"#,
        policy_value
    )
}
