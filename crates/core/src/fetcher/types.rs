//! Core data types and the fetcher error taxonomy.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors raised by fetcher operations.
///
/// Transport-layer failures surface unwrapped once the retry budget is
/// exhausted; everything else is raised synchronously to the caller with no
/// internal recovery.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// A site-level sanity check failed: the site is unreachable or has
    /// changed shape.
    #[error("Site check failed: {0}")]
    Site(String),

    /// Login preconditions unmet, captcha/session extraction failed, or
    /// credentials were rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Protocol-level violation: operation on a non-matching torrent, an
    /// expected marker absent from a scraped page, or invalid fetched data.
    #[error("Logic error: {0}")]
    Logic(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FetcherError {
    pub fn site(msg: impl Into<String>) -> Self {
        Self::Site(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn logic(msg: impl Into<String>) -> Self {
        Self::Logic(msg.into())
    }
}

/// A locally-tracked torrent record. Read-only to this crate: the comment
/// identifies the tracker topic, the hash is the stored hex fingerprint of
/// the content (possibly empty), the data is the raw torrent payload.
#[derive(Debug, Clone, Default)]
pub struct Torrent {
    pub comment: Option<String>,
    pub hash: String,
    pub data: Vec<u8>,
}

impl Torrent {
    pub fn comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Case-insensitive fingerprint comparison against `other`, which must
    /// already be lowercase hex.
    pub fn hash_equals(&self, other: &str) -> bool {
        self.hash.to_lowercase() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_comparison_is_case_insensitive() {
        let torrent = Torrent {
            comment: None,
            hash: "ABCDEF0123".to_string(),
            data: Vec::new(),
        };
        assert!(torrent.hash_equals("abcdef0123"));
        assert!(!torrent.hash_equals("abcdef0124"));
    }

    #[test]
    fn test_missing_comment_is_empty() {
        let torrent = Torrent::default();
        assert_eq!(torrent.comment(), "");
    }

    #[test]
    fn test_transport_error_wraps_transparently() {
        let err: FetcherError = TransportError::Timeout.into();
        assert_eq!(err.to_string(), "Request timeout");
    }
}
