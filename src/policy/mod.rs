// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content-Security-Policy model and synthesis
//!
//! - Ordered directive -> token-list policy with structural merge
//! - Built-in default policy
//! - Synthesizer folding collected hashes into the final serialized value

mod defaults;
mod policy;
mod synth;

pub use defaults::default_policy;
pub use policy::Policy;
pub use synth::{meta_tag, synthesize, PolicySynthesis};
