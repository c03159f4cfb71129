// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content digesting for CSP hash sources and SRI tokens
//!
//! Pure functions: same UTF-8 input, same algorithm, same output, every
//! build. Browsers compare these digests byte for byte, so any
//! nondeterminism here breaks the emitted policy at runtime.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Hash algorithm for CSP and SRI tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256 (CSP default)
    #[default]
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Token prefix as it appears in policies and integrity attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Parse from a lowercase name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sha256" => Some(HashAlgorithm::Sha256),
            "sha384" => Some(HashAlgorithm::Sha384),
            "sha512" => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest content with the given algorithm
///
/// Returns the standard base64 encoding of the raw hash bytes, the form
/// CSP level 3 hash sources and SRI integrity values both consume.
pub fn digest(content: &str, algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => BASE64.encode(Sha256::digest(content.as_bytes())),
        HashAlgorithm::Sha384 => BASE64.encode(Sha384::digest(content.as_bytes())),
        HashAlgorithm::Sha512 => BASE64.encode(Sha512::digest(content.as_bytes())),
    }
}

/// Digest raw bytes (emitted bundle assets are hashed as-is, not re-decoded)
pub fn digest_bytes(content: &[u8], algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => BASE64.encode(Sha256::digest(content)),
        HashAlgorithm::Sha384 => BASE64.encode(Sha384::digest(content)),
        HashAlgorithm::Sha512 => BASE64.encode(Sha512::digest(content)),
    }
}

/// Format an SRI integrity attribute value: `<algorithm>-<digest>`
pub fn integrity_value(algorithm: HashAlgorithm, digest: &str) -> String {
    format!("{}-{}", algorithm.as_str(), digest)
}

/// Format a quoted CSP hash source token: `'<algorithm>-<digest>'`
pub fn csp_token(algorithm: HashAlgorithm, digest: &str) -> String {
    format!("'{}-{}'", algorithm.as_str(), digest)
}
