// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Built-in default policy
//!
//! A conservative 'self'-only baseline. Hash tokens collected during the
//! build are appended to the -elem directives by the synthesizer; users
//! widen individual directives through `CspOptions::policy`.

use lazy_static::lazy_static;

use super::Policy;

lazy_static! {
    static ref DEFAULT_POLICY: Policy = {
        let mut policy = Policy::new();
        policy.set("default-src", vec!["'self'".to_string()]);
        policy.set("script-src", vec!["'self'".to_string()]);
        policy.set("script-src-elem", vec!["'self'".to_string()]);
        policy.set("style-src", vec!["'self'".to_string()]);
        policy.set("style-src-elem", vec!["'self'".to_string()]);
        policy
    };
}

/// The default policy a build starts from
pub fn default_policy() -> Policy {
    DEFAULT_POLICY.clone()
}
