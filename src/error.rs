// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for cspforge
//!
//! The only fatal class is configuration resolution: an unsupported host
//! target aborts before any scanning starts. Everything discovered during
//! scanning degrades to warnings or per-element recovery so a single bad
//! element never blocks a build.

use thiserror::Error;

/// Result type alias for cspforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cspforge
#[derive(Error, Debug)]
pub enum Error {
    /// Host build configuration is unsupported (non-SPA, SSR, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTML parsing failed
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// A single element failed classification or hashing
    #[error("Element processing error in <{tag}>: {reason}")]
    Element { tag: String, reason: String },

    /// Selector parsing error
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an HTML parsing error
    pub fn html_parse<S: Into<String>>(msg: S) -> Self {
        Error::HtmlParse(msg.into())
    }

    /// Create an element processing error
    pub fn element(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Element {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error must abort the build
    ///
    /// Only configuration errors are fatal; element-level failures are
    /// recovered by the HTML pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this is a per-element error the HTML pass recovers from
    pub fn is_element_error(&self) -> bool {
        matches!(self, Error::Element { .. })
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_fatal() {
        let err = Error::config("SSR targets are not supported");
        assert!(err.is_fatal());
        assert!(!err.is_element_error());
    }

    #[test]
    fn test_element_error_is_recoverable() {
        let err = Error::element("script", "unreadable text node");
        assert!(!err.is_fatal());
        assert!(err.is_element_error());
        assert_eq!(
            err.to_string(),
            "Element processing error in <script>: unreadable text node"
        );
    }

    #[test]
    fn test_from_string() {
        let err: Error = "something broke".into();
        assert!(matches!(err, Error::Other(_)));
    }
}
